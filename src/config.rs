//! Configuration for the quality filter and chunker

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PrepError, Result};

/// Inputs shorter than this are joined instead of chunked
pub const DEFAULT_MIN_SENTENCES: usize = 10;

/// Top-level configuration, loadable from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub cleaner: CleanerConfig,
    pub chunker: ChunkerConfig,
    /// Draw progress bars on stderr
    pub show_progress: bool,
}

impl PrepConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            PrepError::InvalidConfig(format!("config at line {}: {}", e.line(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.cleaner.validate()?;
        self.chunker.validate()
    }
}

/// Thresholds for the two filter passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Minimum letter-length score a sentence must exceed
    pub counting_avg: f64,
    /// Digit-word ratio a sentence must stay below
    pub number_ratio: f64,
    /// Sentences with fewer words skip the letter-length check
    pub short_word_threshold: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            counting_avg: 0.65,
            number_ratio: 0.7,
            short_word_threshold: 7,
        }
    }
}

impl CleanerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.counting_avg.is_finite() {
            return Err(PrepError::InvalidConfig(format!(
                "counting_avg must be finite, got {}",
                self.counting_avg
            )));
        }
        if !self.number_ratio.is_finite() {
            return Err(PrepError::InvalidConfig(format!(
                "number_ratio must be finite, got {}",
                self.number_ratio
            )));
        }
        Ok(())
    }
}

/// What happens to the sentence that pushes a chunk over its token budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// The sentence is dropped and the next chunk starts empty
    #[default]
    Discard,
    /// The sentence starts the next chunk
    CarryForward,
}

/// Budget and execution settings for the chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Word budget. Takes precedence over `token_seq_length` when set.
    pub seq_length: Option<usize>,
    /// Token budget, measured with the configured tokenizer
    pub token_seq_length: Option<usize>,
    /// Run the token-budget strategy over partitions in a worker pool
    pub parallelize: bool,
    /// Worker count and partition count for parallel mode
    pub cpu_count: usize,
    /// What the token strategy does with the sentence that overflows the budget
    pub overflow_policy: OverflowPolicy,
    /// Emit the leftover accumulator after the last sentence
    pub flush_trailing: bool,
    /// Inputs with fewer sentences are joined into one string instead of chunked
    pub min_sentences: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            seq_length: None,
            token_seq_length: None,
            parallelize: false,
            cpu_count: default_cpu_count(),
            overflow_policy: OverflowPolicy::Discard,
            flush_trailing: false,
            min_sentences: DEFAULT_MIN_SENTENCES,
        }
    }
}

fn default_cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl ChunkerConfig {
    /// Word-count budget
    pub fn by_words(seq_length: usize) -> Self {
        Self {
            seq_length: Some(seq_length),
            ..Self::default()
        }
    }

    /// Tokenizer-measured budget
    pub fn by_tokens(token_seq_length: usize) -> Self {
        Self {
            token_seq_length: Some(token_seq_length),
            ..Self::default()
        }
    }

    /// Enable parallel mode with the given worker count
    pub fn parallel(mut self, cpu_count: usize) -> Self {
        self.parallelize = true;
        self.cpu_count = cpu_count;
        self
    }

    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    pub fn flush_trailing(mut self, flush: bool) -> Self {
        self.flush_trailing = flush;
        self
    }

    /// Whether dispatch goes to the tokenizer-budget strategy
    pub fn uses_tokens(&self) -> bool {
        self.seq_length.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpu_count == 0 {
            return Err(PrepError::InvalidConfig(
                "cpu_count must be at least 1".to_string(),
            ));
        }
        match (self.seq_length, self.token_seq_length) {
            (None, None) => Err(PrepError::InvalidConfig(
                "one of seq_length or token_seq_length must be set".to_string(),
            )),
            (Some(0), _) => Err(PrepError::InvalidConfig(
                "seq_length must be at least 1".to_string(),
            )),
            (None, Some(0)) => Err(PrepError::InvalidConfig(
                "token_seq_length must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
