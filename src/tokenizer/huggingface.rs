//! Adapter over a HuggingFace `tokenizer.json`

use std::path::Path;

use super::{Tokenizer, TokenizerError};

pub struct HuggingFaceTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HuggingFaceTokenizer {
    /// Load tokenizer from a `tokenizer.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenizerError> {
        let inner = tokenizers::Tokenizer::from_file(path.as_ref())
            .map_err(|e| TokenizerError::Load(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(Self { inner })
    }
}

impl Tokenizer for HuggingFaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }

    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.len())
    }
}
