use crate::transcript::Transcript;

const BLOCK_OPENERS: [char; 4] = [':', '{', '(', '['];

pub fn leading_indent(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

pub fn opens_block(line: &str) -> bool {
    line.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| BLOCK_OPENERS.contains(&c))
}

/// indentation for the next input line, read off the previously executed
/// lines as if they were file content
pub fn next_line_indent(transcript: &Transcript, width: usize) -> String {
    let Some(last) = transcript.lines().rev().find(|l| !l.trim().is_empty()) else {
        return String::new();
    };

    let mut indent = leading_indent(last).to_string();
    if opens_block(last) {
        indent.push_str(&" ".repeat(width));
    }
    indent
}
