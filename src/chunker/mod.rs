//! Regroups consecutive sentences into larger blocks under a size budget
//!
//! Budgets are either a whitespace word count or a token count measured by
//! an external [`Tokenizer`]. The token budget can also run data-parallel
//! over static partitions; see [`partition_bounds`] for how the input is
//! split and why that output differs from a single sequential run.

mod parallel;
mod token_budget;
mod word_budget;


pub use parallel::partition_bounds;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ChunkerConfig;
use crate::error::{PrepError, Result};
use crate::progress;
use crate::tokenizer::Tokenizer;
use token_budget::TokenBudget;

/// Result of a chunking call
///
/// Inputs below the configured minimum are not chunked at all; they come
/// back as one space-joined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutput {
    Chunks(Vec<String>),
    Joined(String),
}

impl ChunkOutput {
    /// Flatten into output lines. A joined result is one line.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Chunks(chunks) => chunks,
            Self::Joined(text) => vec![text],
        }
    }

    pub fn chunks(&self) -> Option<&[String]> {
        match self {
            Self::Chunks(chunks) => Some(chunks),
            Self::Joined(_) => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined(_))
    }
}

/// Which algorithm a chunking call went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Joined,
    WordBudget,
    TokenBudget,
    ParallelTokenBudget,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Joined => "joined",
            Self::WordBudget => "word budget",
            Self::TokenBudget => "token budget",
            Self::ParallelTokenBudget => "parallel token budget",
        })
    }
}

/// Merges sentences into chunks under a word or token budget.
///
/// The strategy is picked from the config per call, see [`Chunker::strategy_for`].
pub struct Chunker {
    config: ChunkerConfig,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    show_progress: bool,
}

impl Chunker {
    /// Create a chunker, failing fast on an unusable configuration
    ///
    /// A tokenizer is required whenever `seq_length` is unset.
    pub fn new(config: ChunkerConfig, tokenizer: Option<Arc<dyn Tokenizer>>) -> Result<Self> {
        config.validate()?;
        if config.uses_tokens() && tokenizer.is_none() {
            return Err(PrepError::MissingTokenizer);
        }
        if config.seq_length.is_some() && config.token_seq_length.is_some() {
            warn!("Both seq_length and token_seq_length are set; using seq_length");
        }

        Ok(Self {
            config,
            tokenizer,
            show_progress: false,
        })
    }

    /// Draw progress bars while chunking
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Strategy [`chunk`](Self::chunk) would use for `len` sentences
    pub fn strategy_for(&self, len: usize) -> Strategy {
        if len < self.config.min_sentences {
            Strategy::Joined
        } else if !self.config.uses_tokens() {
            Strategy::WordBudget
        } else if self.config.parallelize {
            Strategy::ParallelTokenBudget
        } else {
            Strategy::TokenBudget
        }
    }

    /// Chunk sentences with the configured strategy
    pub fn chunk<S: AsRef<str> + Sync>(&self, sentences: &[S]) -> Result<ChunkOutput> {
        let strategy = self.strategy_for(sentences.len());
        debug!(%strategy, sentences = sentences.len(), "dispatching chunker");

        match strategy {
            Strategy::Joined => {
                warn!(
                    "List is too small to chunk ({} < {} sentences), joining instead",
                    sentences.len(),
                    self.config.min_sentences
                );
                let joined = sentences
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(" ");
                Ok(ChunkOutput::Joined(joined))
            }
            Strategy::WordBudget => self.chunk_by_words(sentences).map(ChunkOutput::Chunks),
            Strategy::TokenBudget => self.chunk_by_tokens(sentences).map(ChunkOutput::Chunks),
            Strategy::ParallelTokenBudget => self
                .chunk_by_tokens_parallel(sentences)
                .map(ChunkOutput::Chunks),
        }
    }

    /// Word-count strategy
    ///
    /// A chunk is emitted as soon as the accumulated word count exceeds
    /// `seq_length`, so it includes the sentence that crossed the budget.
    /// Leftover sentences are dropped unless `flush_trailing` is set.
    pub fn chunk_by_words<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Vec<String>> {
        let seq_length = self.config.seq_length.ok_or_else(|| {
            PrepError::InvalidConfig("word-count chunking needs seq_length".to_string())
        })?;

        let pb = progress::bar(
            sentences.len(),
            format!("Chunking into seq_length {}", seq_length),
            self.show_progress,
        );
        let chunks =
            word_budget::chunk_by_word_budget(sentences, seq_length, self.config.flush_trailing, &pb);
        pb.finish_and_clear();

        debug!(chunks = chunks.len(), "word-count chunking done");
        Ok(chunks)
    }

    /// Sequential token-budget strategy
    ///
    /// When a sentence pushes the accumulated text over `token_seq_length`,
    /// the text as it was before that sentence is emitted. Under
    /// [`OverflowPolicy::Discard`](crate::config::OverflowPolicy::Discard)
    /// the overflowing sentence itself is lost.
    pub fn chunk_by_tokens<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Vec<String>> {
        let budget = self.token_budget()?;

        let pb = progress::bar(
            sentences.len(),
            format!("Chunking into token_seq_length {}", budget.limit),
            self.show_progress,
        );
        let chunks = budget.chunk(sentences, &pb)?;
        pb.finish_and_clear();

        debug!(chunks = chunks.len(), "token-budget chunking done");
        Ok(chunks)
    }

    /// Parallel token-budget strategy
    ///
    /// Splits the input into `cpu_count` contiguous partitions, runs the
    /// sequential strategy on each in a worker pool and concatenates the
    /// results in partition order. Accumulators reset at every partition
    /// edge, so this is equal to chunking each partition on its own, not to
    /// one sequential run over the whole input.
    pub fn chunk_by_tokens_parallel<S: AsRef<str> + Sync>(
        &self,
        sentences: &[S],
    ) -> Result<Vec<String>> {
        let budget = self.token_budget()?;
        let chunks =
            parallel::chunk_partitions(sentences, self.config.cpu_count, &budget, self.show_progress)?;

        debug!(
            chunks = chunks.len(),
            workers = self.config.cpu_count,
            "parallel token-budget chunking done"
        );
        Ok(chunks)
    }

    fn token_budget(&self) -> Result<TokenBudget<'_>> {
        let tokenizer = self.tokenizer.as_deref().ok_or(PrepError::MissingTokenizer)?;
        let limit = self.config.token_seq_length.ok_or_else(|| {
            PrepError::InvalidConfig("token-budget chunking needs token_seq_length".to_string())
        })?;

        Ok(TokenBudget {
            tokenizer,
            limit,
            policy: self.config.overflow_policy,
            flush_trailing: self.config.flush_trailing,
        })
    }
}
