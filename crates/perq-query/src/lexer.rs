//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word (term value, number, or the `geo` marker).
    Term(String),

    /// A quoted value (the quotes are stripped, content preserved verbatim).
    Quoted(String),

    /// Field prefix (e.g., "greeting:" produces FieldPrefix("greeting")).
    FieldPrefix(String),

    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// The TO keyword inside a range.
    To,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Left bracket (range start).
    LBracket,

    /// Right bracket (range end).
    RBracket,

    /// Comma (geo argument separator).
    Comma,
}

/// Characters that terminate a bare word.
fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | ',' | '"' | ':')
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_quoted(),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '[' => {
                self.advance();
                Ok(Some(Token::LBracket))
            }
            ']' => {
                self.advance();
                Ok(Some(Token::RBracket))
            }
            ',' => {
                self.advance();
                Ok(Some(Token::Comma))
            }
            ':' => Err(self.error_at("expected field name before ':'", self.position)),
            _ => self.read_word(),
        }
    }

    /// Reads a quoted value.
    fn read_quoted(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Some(Token::Quoted(content)));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(self.error_at("unclosed quote", start_pos));
                }
            }
        }
    }

    /// Reads a bare word, keyword (AND/OR/TO), or field prefix.
    fn read_word(&mut self) -> Result<Option<Token>, LexError> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch == ':' {
                self.advance(); // consume the colon
                if word.is_empty() {
                    return Err(self.error_at("expected field name before ':'", self.position));
                }
                return Ok(Some(Token::FieldPrefix(word)));
            }

            if is_word_boundary(ch) {
                break;
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            return Ok(None);
        }

        if word.eq_ignore_ascii_case("AND") {
            return Ok(Some(Token::And));
        }
        if word.eq_ignore_ascii_case("OR") {
            return Ok(Some(Token::Or));
        }
        if word.eq_ignore_ascii_case("TO") {
            return Ok(Some(Token::To));
        }

        Ok(Some(Token::Term(word)))
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn field_term() {
        assert_eq!(
            tokenize("greeting:happy").unwrap(),
            vec![
                Token::FieldPrefix("greeting".into()),
                Token::Term("happy".into())
            ]
        );
    }

    #[test]
    fn quoted_value() {
        assert_eq!(
            tokenize("label:\"new york\"").unwrap(),
            vec![
                Token::FieldPrefix("label".into()),
                Token::Quoted("new york".into())
            ]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("label:\"new york").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn range_tokens() {
        assert_eq!(
            tokenize("int_field:[0 TO 5]").unwrap(),
            vec![
                Token::FieldPrefix("int_field".into()),
                Token::LBracket,
                Token::Term("0".into()),
                Token::To,
                Token::Term("5".into()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn negative_range_endpoint() {
        assert_eq!(
            tokenize("t:[-5 TO -1]").unwrap(),
            vec![
                Token::FieldPrefix("t".into()),
                Token::LBracket,
                Token::Term("-5".into()),
                Token::To,
                Token::Term("-1".into()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn geo_tokens() {
        assert_eq!(
            tokenize("location:geo(6.9, 79.8, 30000)").unwrap(),
            vec![
                Token::FieldPrefix("location".into()),
                Token::Term("geo".into()),
                Token::LParen,
                Token::Term("6.9".into()),
                Token::Comma,
                Token::Term("79.8".into()),
                Token::Comma,
                Token::Term("30000".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn or_keyword_case_insensitive() {
        for input in ["a:x OR b:y", "a:x or b:y", "a:x Or b:y"] {
            assert_eq!(
                tokenize(input).unwrap(),
                vec![
                    Token::FieldPrefix("a".into()),
                    Token::Term("x".into()),
                    Token::Or,
                    Token::FieldPrefix("b".into()),
                    Token::Term("y".into()),
                ]
            );
        }
    }

    #[test]
    fn explicit_and_keyword() {
        assert_eq!(
            tokenize("a:x AND b:y").unwrap(),
            vec![
                Token::FieldPrefix("a".into()),
                Token::Term("x".into()),
                Token::And,
                Token::FieldPrefix("b".into()),
                Token::Term("y".into()),
            ]
        );
    }

    #[test]
    fn parentheses() {
        assert_eq!(
            tokenize("(a:x b:y)").unwrap(),
            vec![
                Token::LParen,
                Token::FieldPrefix("a".into()),
                Token::Term("x".into()),
                Token::FieldPrefix("b".into()),
                Token::Term("y".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn bare_colon_is_error() {
        let err = tokenize(":oops").unwrap_err();
        assert!(err.message.contains("field name"));
    }

    #[test]
    fn extra_whitespace() {
        assert_eq!(
            tokenize("  a:x   b:y  ").unwrap(),
            vec![
                Token::FieldPrefix("a".into()),
                Token::Term("x".into()),
                Token::FieldPrefix("b".into()),
                Token::Term("y".into()),
            ]
        );
    }
}
