use super::{Tokenizer, TokenizerError};

/// Treats every whitespace-delimited word as one token
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(text.split_whitespace().count())
    }
}
