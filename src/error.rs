use std::path::PathBuf;
use thiserror::Error;

use crate::tokenizer::TokenizerError;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("token_seq_length is set but no tokenizer is configured")]
    MissingTokenizer,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tokenizer failed: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
