// Public API exports
pub mod chunker;
pub mod cleaner;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod tokenizer;

// Re-export main types for convenience
pub use error::{PrepError, Result};

pub use config::{ChunkerConfig, CleanerConfig, OverflowPolicy, PrepConfig};

pub use cleaner::{CleanReport, WordCleaner};

pub use chunker::{ChunkOutput, Chunker, Strategy, partition_bounds};

pub use tokenizer::{
    CharEstimateTokenizer, Tokenizer, TokenizerError, TokenizerKind, WhitespaceTokenizer,
    load_tokenizer,
};

#[cfg(feature = "huggingface")]
pub use tokenizer::HuggingFaceTokenizer;

pub use corpus::{OutputFormat, read_sentences, write_lines};

pub use pipeline::{Pipeline, PipelineOutput, RunReport};
