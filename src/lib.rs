pub mod config;
pub mod console;
pub mod eval;
pub mod history;
pub mod indent;
pub mod session;
pub mod transcript;

pub use history::HistoryStore;
pub use session::Session;
pub use transcript::{Transcript, TranscriptError};
