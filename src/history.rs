use tracing::{debug, error, trace};

use crate::transcript::Transcript;

/// Ctrl+Up / Ctrl+Down history for one console session.
///
/// Entries are the committed lines followed by the live buffer (the line
/// being composed). `cursor == committed.len()` means the live buffer is
/// shown.
#[derive(Debug, Default)]
pub struct HistoryStore {
    committed: Vec<String>,
    live: String,
    cursor: usize,
    transcript: Transcript,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            committed: Vec::new(),
            live: String::new(),
            cursor: 0,
            transcript: Transcript::new(),
        }
    }

    /// replace the live buffer; cursor and transcript are untouched
    pub fn update(&mut self, line: &str) {
        trace!(line, "history buffer updated");
        self.live.clear();
        self.live.push_str(line);
    }

    /// seal the live buffer into history
    ///
    /// The transcript always records the line, blank or not. Only a non-empty
    /// line becomes a recallable entry. No trimming: whitespace counts as
    /// content.
    pub fn commit(&mut self) {
        let line = std::mem::take(&mut self.live);

        if let Err(e) = self.transcript.append_line(&line) {
            error!(error = %e, "failed to append committed line to transcript");
        }

        if !line.is_empty() {
            self.committed.push(line);
        }
        self.cursor = self.committed.len();

        debug!(
            entries = self.len(),
            transcript_len = self.transcript.len(),
            "history committed"
        );
    }

    /// step towards older entries; false when already at the oldest
    pub fn prev(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            trace!(cursor = self.cursor, "history prev");
            return true;
        }

        false
    }

    /// step towards the live buffer; false when already on it
    pub fn next(&mut self) -> bool {
        if self.cursor < self.committed.len() {
            self.cursor += 1;
            trace!(cursor = self.cursor, "history next");
            return true;
        }

        false
    }

    /// entry under the cursor
    pub fn get(&self) -> &str {
        self.committed
            .get(self.cursor)
            .map_or(self.live.as_str(), String::as_str)
    }

    /// the line being composed, wherever the cursor is
    pub fn buffer_line(&self) -> &str {
        &self.live
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// committed entries followed by the live buffer
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.committed
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.live.as_str()))
    }

    /// entry count including the live buffer, so never 0
    pub fn len(&self) -> usize {
        self.committed.len() + 1
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_buffer(&self) -> bool {
        self.cursor == self.committed.len()
    }
}
