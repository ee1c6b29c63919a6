//! Quality filter followed by chunking

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::chunker::{ChunkOutput, Chunker, Strategy};
use crate::cleaner::{CleanReport, WordCleaner};
use crate::config::PrepConfig;
use crate::error::Result;
use crate::tokenizer::Tokenizer;

/// Counts and timing for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub clean: CleanReport,
    pub strategy: Strategy,
    /// Number of chunks emitted, 1 for a joined result
    pub chunks: usize,
    pub clean_secs: f64,
    pub chunk_secs: f64,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: RunReport,
    pub output: ChunkOutput,
}

pub struct Pipeline {
    cleaner: WordCleaner,
    chunker: Chunker,
}

impl Pipeline {
    pub fn new(config: PrepConfig, tokenizer: Option<Arc<dyn Tokenizer>>) -> Result<Self> {
        let cleaner = WordCleaner::new(config.cleaner)?.with_progress(config.show_progress);
        let chunker = Chunker::new(config.chunker, tokenizer)?.with_progress(config.show_progress);
        Ok(Self { cleaner, chunker })
    }

    pub fn cleaner(&self) -> &WordCleaner {
        &self.cleaner
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Filter the sentences, then chunk what survives
    pub fn run<S: AsRef<str>>(&self, sentences: &[S]) -> Result<PipelineOutput> {
        let clean_start = Instant::now();
        let (cleaned, clean) = self.cleaner.clean_with_report(sentences);
        let clean_secs = clean_start.elapsed().as_secs_f64();

        let chunk_start = Instant::now();
        let strategy = self.chunker.strategy_for(cleaned.len());
        let output = self.chunker.chunk(&cleaned)?;
        let chunk_secs = chunk_start.elapsed().as_secs_f64();

        let chunks = match &output {
            ChunkOutput::Chunks(chunks) => chunks.len(),
            ChunkOutput::Joined(_) => 1,
        };
        info!(
            "Pipeline done: {} sentences -> {} kept -> {} chunks ({})",
            clean.input, clean.after_number_filter, chunks, strategy
        );

        Ok(PipelineOutput {
            report: RunReport {
                clean,
                strategy,
                chunks,
                clean_secs,
                chunk_secs,
            },
            output,
        })
    }
}
