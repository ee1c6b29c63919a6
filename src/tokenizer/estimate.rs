use super::{Tokenizer, TokenizerError};

/// Length-based token estimate for when no model tokenizer is at hand
///
/// Packs whole characters into pieces of at most `bytes_per_token` bytes
/// (default 4, the rough 1 token ~ 4 bytes rule). A character wider than
/// the limit is a piece of its own.
#[derive(Debug, Clone, Copy)]
pub struct CharEstimateTokenizer {
    bytes_per_token: usize,
}

impl CharEstimateTokenizer {
    /// Zero is clamped to one byte per token
    pub fn new(bytes_per_token: usize) -> Self {
        Self {
            bytes_per_token: bytes_per_token.max(1),
        }
    }

    pub fn bytes_per_token(&self) -> usize {
        self.bytes_per_token
    }

    /// Byte length of each piece, in order
    fn piece_lengths<'a>(&self, text: &'a str) -> impl Iterator<Item = usize> + 'a {
        let limit = self.bytes_per_token;
        let mut chars = text.chars().peekable();

        std::iter::from_fn(move || {
            let mut len = chars.next()?.len_utf8();
            while let Some(ch) = chars.peek() {
                if len + ch.len_utf8() > limit {
                    break;
                }
                len += ch.len_utf8();
                chars.next();
            }
            Some(len)
        })
    }
}

impl Default for CharEstimateTokenizer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Tokenizer for CharEstimateTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        let mut tokens = Vec::new();
        let mut start = 0;
        for len in self.piece_lengths(text) {
            tokens.push(text[start..start + len].to_string());
            start += len;
        }
        Ok(tokens)
    }

    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.piece_lengths(text).count())
    }
}
