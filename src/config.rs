use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PROMPT: &str = ">>> ";
pub const DEFAULT_INDENT_WIDTH: usize = 4;
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 1000;
const DEFAULT_LOG_FILE: &str = "script-console.log";

/// interactive integer script console with Ctrl+Up / Ctrl+Down history
#[derive(Debug, Parser)]
#[command(name = "script-console", version, about)]
pub struct Args {
    /// prompt shown in front of the input line
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// spaces added by Tab after a line that opens a block
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,

    /// output lines kept on screen before the oldest are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_LINES)]
    pub max_output_lines: usize,

    /// log file, defaults to script-console.log in the temp dir
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// read lines from stdin instead of opening the terminal UI
    #[arg(long)]
    pub batch: bool,
}

impl Args {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            prompt: self.prompt.clone(),
            indent_width: self.indent_width,
            max_output_lines: self.max_output_lines.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub prompt: String,
    pub indent_width: usize,
    pub max_output_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            indent_width: DEFAULT_INDENT_WIDTH,
            max_output_lines: DEFAULT_MAX_OUTPUT_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_session_defaults() {
        let args = Args::parse_from(["script-console"]);
        assert_eq!(args.session_config(), SessionConfig::default());
        assert!(!args.batch);
        assert!(args.log_path().ends_with(DEFAULT_LOG_FILE));
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "script-console",
            "--prompt",
            "$ ",
            "--indent-width",
            "2",
            "--max-output-lines",
            "0",
            "--log-file",
            "/tmp/console.log",
            "--batch",
        ]);
        let config = args.session_config();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.max_output_lines, 1);
        assert_eq!(args.log_path(), PathBuf::from("/tmp/console.log"));
        assert!(args.batch);
    }
}
