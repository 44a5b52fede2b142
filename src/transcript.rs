use std::{fmt, str::Lines};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("transcript only grows at its end (offset {offset}, length {len})")]
    NotAtEnd { offset: usize, len: usize },
}

/// append-only text of every committed console line
///
/// Readers only get `&Transcript`, which exposes no mutation. The owning
/// history store is the sole writer.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    text: String,
    /// number of '\n' written so far
    newlines: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            newlines: 0,
        }
    }

    /// write `text` at byte `offset`, which must be the current end
    fn insert(&mut self, offset: usize, text: &str) -> Result<(), TranscriptError> {
        if offset != self.text.len() {
            return Err(TranscriptError::NotAtEnd {
                offset,
                len: self.text.len(),
            });
        }

        self.text.push_str(text);
        self.newlines += text.bytes().filter(|b| *b == b'\n').count();
        Ok(())
    }

    pub(crate) fn append_line(&mut self, line: &str) -> Result<(), TranscriptError> {
        let mut chunk = String::with_capacity(line.len() + 1);
        chunk.push_str(line);
        chunk.push('\n');
        self.insert(self.text.len(), &chunk)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        // an unterminated tail still counts as a line
        if self.text.ends_with('\n') || self.text.is_empty() {
            self.newlines
        } else {
            self.newlines + 1
        }
    }

    pub fn lines(&self) -> Lines<'_> {
        self.text.lines()
    }

}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert_eq!(transcript.line_count(), 0);
        assert_eq!(transcript.lines().next(), None);
    }

    #[test]
    fn append_line_terminates_each_line() {
        let mut transcript = Transcript::new();
        transcript.append_line("a=1").unwrap();
        transcript.append_line("").unwrap();
        transcript.append_line("b=2").unwrap();

        assert_eq!(transcript.as_str(), "a=1\n\nb=2\n");
        assert_eq!(transcript.line_count(), 3);
        assert_eq!(transcript.lines().collect::<Vec<_>>(), vec!["a=1", "", "b=2"]);
        assert_eq!(transcript.to_string(), "a=1\n\nb=2\n");
    }

    #[test]
    fn writes_before_the_end_are_rejected() {
        let mut transcript = Transcript::new();
        transcript.append_line("x").unwrap();

        let err = transcript.insert(0, "y").unwrap_err();
        assert_eq!(err, TranscriptError::NotAtEnd { offset: 0, len: 2 });
        let err = transcript.insert(1, "y").unwrap_err();
        assert_eq!(err, TranscriptError::NotAtEnd { offset: 1, len: 2 });
        assert_eq!(transcript.as_str(), "x\n");
    }

    #[test]
    fn writes_past_the_end_are_rejected() {
        let mut transcript = Transcript::new();
        let err = transcript.insert(10, "y").unwrap_err();
        assert_eq!(err, TranscriptError::NotAtEnd { offset: 10, len: 0 });
        assert!(transcript.is_empty());
    }

    #[test]
    fn unterminated_write_still_counts_as_line() {
        let mut transcript = Transcript::new();
        transcript.insert(0, "partial").unwrap();
        assert_eq!(transcript.line_count(), 1);
        assert_eq!(transcript.to_string(), "partial");
    }
}
