//! Error types for query lexing and parsing.

use std::{error::Error, fmt};

use thiserror::Error as ThisError;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        // The caret column is counted in characters, not bytes.
        let column = self
            .input
            .char_indices()
            .take_while(|(i, _)| *i < self.position)
            .count();
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!("  {}^", " ".repeat(column)));
        result
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl Error for LexError {}

/// Parse error with token position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Token index where error occurred (if applicable).
    pub token_index: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, token_index: Option<usize>) -> Self {
        Self {
            message: message.into(),
            token_index,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(idx) = self.token_index {
            write!(f, "at token {}: {}", idx, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for ParseError {}

/// A unified error type for query parsing.
#[derive(Debug, Clone, ThisError)]
pub enum QueryError {
    /// Tokenization failed.
    #[error("{0}")]
    Lex(#[from] LexError),

    /// The token stream is not a valid query.
    #[error("query syntax error: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_context_points_at_position() {
        let err = LexError::new("unexpected character", 4, "a:x \u{1}");
        let formatted = err.format_with_context();
        assert!(formatted.contains("unexpected character"));
        assert!(formatted.lines().last().unwrap().ends_with("    ^"));
    }

    #[test]
    fn lex_error_caret_counts_characters_not_bytes() {
        // "é" is two bytes; the caret must still land under the bad character.
        let input = "é:x \u{1}";
        let position = input.find('\u{1}').unwrap();
        let err = LexError::new("unexpected character", position, input);
        let formatted = err.format_with_context();
        assert!(formatted.lines().last().unwrap().ends_with("    ^"));
    }

    #[test]
    fn parse_error_displays_token_index() {
        let err = ParseError::new("unexpected OR", Some(3));
        assert_eq!(err.to_string(), "at token 3: unexpected OR");
    }
}
