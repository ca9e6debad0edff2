//! Text analysis pipeline for perq indexes.
//!
//! Implements a three-stage text analysis pipeline:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - removes tokens longer than 40 bytes
//!
//! There is deliberately no stemmer: a stored term query must match document
//! tokens literally, and the same pipeline is shared by the stored-query
//! index, the transient document index, and extraction, so that a term
//! extracted at write time is byte-identical to the token produced from a
//! matching document at percolate time.

use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};

/// Name of the custom tokenizer registered with Tantivy.
pub const PERQ_TOKENIZER: &str = "perq_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Builds the perq text analyzer.
pub fn build_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .build()
}

/// Runs text through the analyzer, collecting the produced tokens.
pub fn tokenize(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }
    tokens
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_and_lowercases() {
        let mut analyzer = build_analyzer();
        assert_eq!(
            tokenize(&mut analyzer, "Happy Holidays!"),
            vec!["happy", "holidays"]
        );
    }

    #[test]
    fn no_stemming() {
        let mut analyzer = build_analyzer();
        assert_eq!(tokenize(&mut analyzer, "greetings"), vec!["greetings"]);
    }

    #[test]
    fn drops_overlong_tokens() {
        let mut analyzer = build_analyzer();
        let long = "x".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(tokenize(&mut analyzer, &long).is_empty());
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        let mut analyzer = build_analyzer();
        assert!(tokenize(&mut analyzer, "").is_empty());
    }
}
