mod estimate;
#[cfg(feature = "huggingface")]
mod huggingface;
mod whitespace;


pub use estimate::CharEstimateTokenizer;
#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceTokenizer;
pub use whitespace::WhitespaceTokenizer;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Failed to load tokenizer: {0}")]
    Load(String),

    #[error("Failed to encode text: {0}")]
    Encode(String),
}

/// Capability the token-budget chunker measures candidate chunks with.
///
/// Implementations must be deterministic and callable from several worker
/// threads at once, since the parallel chunker shares one instance.
pub trait Tokenizer: Send + Sync {
    /// Split text into tokens
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError>;

    /// Number of tokens in text
    ///
    /// Override when counting is cheaper than materializing the tokens.
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.tokenize(text)?.len())
    }
}

/// Bundled tokenizer implementations selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Whitespace-delimited words
    Whitespace,
    /// Byte-length estimate (~4 bytes per token)
    Estimate,
    /// HuggingFace `tokenizer.json` (requires the `huggingface` feature)
    Huggingface,
}

/// Build a shared tokenizer handle
///
/// `file` is only read by tokenizers backed by a model file.
pub fn load_tokenizer(
    kind: TokenizerKind,
    file: Option<&Path>,
) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    match kind {
        TokenizerKind::Whitespace => Ok(Arc::new(WhitespaceTokenizer)),
        TokenizerKind::Estimate => Ok(Arc::new(CharEstimateTokenizer::default())),
        TokenizerKind::Huggingface => load_huggingface(file),
    }
}

#[cfg(feature = "huggingface")]
fn load_huggingface(file: Option<&Path>) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    let path = file.ok_or_else(|| {
        TokenizerError::Load("a tokenizer file is required for huggingface".to_string())
    })?;
    Ok(Arc::new(HuggingFaceTokenizer::from_file(path)?))
}

#[cfg(not(feature = "huggingface"))]
fn load_huggingface(_file: Option<&Path>) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    Err(TokenizerError::Load(
        "built without the `huggingface` feature".to_string(),
    ))
}
