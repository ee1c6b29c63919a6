//! Heuristic quality filter for raw sentence corpora
//!
//! Two passes, each keeping or dropping sentences independently:
//! - letter-length: drops sentences dominated by single-character words,
//!   typically spaced-out letters from degraded scans
//! - digit-density: drops sentences that are mostly numbers (tables, lists)
//!
//! Surviving sentences keep their original order.

pub mod heuristics;

#[cfg(test)]
mod tests;

use tracing::{debug, info};

use crate::config::CleanerConfig;
use crate::error::Result;
use crate::progress;
use heuristics::{DigitCounts, LengthCounts, has_digit};

/// Sentence counts after each filter pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleanReport {
    pub input: usize,
    pub after_length_filter: usize,
    pub after_number_filter: usize,
}

/// Two-pass quality filter: letter-length first, then digit density.
///
/// Both passes keep input order and only ever drop sentences.
pub struct WordCleaner {
    config: CleanerConfig,
    show_progress: bool,
}

impl WordCleaner {
    pub fn new(config: CleanerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    /// Draw progress bars while filtering
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Run the letter-length pass, then the digit-density pass
    pub fn clean_pipe<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<String> {
        self.clean_with_report(sentences).0
    }

    /// Like [`clean_pipe`](Self::clean_pipe), also returning per-pass counts
    pub fn clean_with_report<S: AsRef<str>>(&self, sentences: &[S]) -> (Vec<String>, CleanReport) {
        info!("Before filtering by length counter: {}", sentences.len());
        let by_length = self.filter_letter_length(sentences);
        info!("After filtering by length counter: {}", by_length.len());

        let by_number = self.filter_digit_density(&by_length);
        info!("After filtering by number counter: {}", by_number.len());

        let report = CleanReport {
            input: sentences.len(),
            after_length_filter: by_length.len(),
            after_number_filter: by_number.len(),
        };
        (by_number, report)
    }

    /// Letter-length pass
    ///
    /// Keeps a sentence when its score exceeds `counting_avg`, or when it has
    /// fewer than `short_word_threshold` words.
    pub fn filter_letter_length<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<String> {
        let pb = progress::bar(
            sentences.len(),
            "Length counter filtering",
            self.show_progress,
        );

        let kept: Vec<String> = sentences
            .iter()
            .map(AsRef::as_ref)
            .inspect(|_| pb.inc(1))
            .filter(|sentence| self.keeps_letter_length(sentence))
            .map(str::to_string)
            .collect();

        pb.finish_and_clear();
        debug!(
            dropped = sentences.len() - kept.len(),
            "letter-length pass done"
        );
        kept
    }

    /// Digit-density pass
    ///
    /// Sentences without digits always survive. Otherwise the ratio of
    /// digit-bearing words to other words must stay below `number_ratio`.
    pub fn filter_digit_density<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<String> {
        let pb = progress::bar(
            sentences.len(),
            "Number counter filtering",
            self.show_progress,
        );

        let kept: Vec<String> = sentences
            .iter()
            .map(AsRef::as_ref)
            .inspect(|_| pb.inc(1))
            .filter(|sentence| self.keeps_digit_density(sentence))
            .map(str::to_string)
            .collect();

        pb.finish_and_clear();
        debug!(
            dropped = sentences.len() - kept.len(),
            "digit-density pass done"
        );
        kept
    }

    pub fn keeps_letter_length(&self, sentence: &str) -> bool {
        let counts = LengthCounts::of(sentence);
        counts.score() > self.config.counting_avg
            || counts.words() < self.config.short_word_threshold
    }

    pub fn keeps_digit_density(&self, sentence: &str) -> bool {
        if !has_digit(sentence) {
            return true;
        }
        DigitCounts::of(sentence).ratio() < self.config.number_ratio
    }
}

impl Default for WordCleaner {
    fn default() -> Self {
        Self {
            config: CleanerConfig::default(),
            show_progress: false,
        }
    }
}
