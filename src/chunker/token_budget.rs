use indicatif::ProgressBar;
use tracing::debug;

use crate::config::OverflowPolicy;
use crate::error::Result;
use crate::tokenizer::Tokenizer;

/// Settings for one token-budget run. Shared read-only across workers.
pub(crate) struct TokenBudget<'a> {
    pub tokenizer: &'a dyn Tokenizer,
    pub limit: usize,
    pub policy: OverflowPolicy,
    pub flush_trailing: bool,
}

/// The last two stripped accumulator states
///
/// Only these two are ever read, so older states are not retained. The
/// window is not cleared when a chunk is emitted.
#[derive(Debug, Default)]
struct SnapshotWindow {
    previous: Option<String>,
    latest: Option<String>,
}

impl SnapshotWindow {
    fn push(&mut self, snapshot: String) {
        self.previous = self.latest.replace(snapshot);
    }

    fn restart(&mut self, snapshot: String) {
        self.previous = None;
        self.latest = Some(snapshot);
    }

    fn latest(&self) -> &str {
        self.latest.as_deref().unwrap_or_default()
    }
}

impl TokenBudget<'_> {
    pub fn chunk<S: AsRef<str>>(&self, sentences: &[S], pb: &ProgressBar) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut window = SnapshotWindow::default();

        for sentence in sentences {
            let sentence = sentence.as_ref();
            current.push(' ');
            current.push_str(sentence);
            window.push(current.trim().to_string());

            let tokens = self.tokenizer.count_tokens(window.latest())?;
            if tokens > self.limit {
                match &window.previous {
                    Some(before) => chunks.push(before.clone()),
                    None => debug!(tokens, "first sentence exceeds the token budget, nothing to emit"),
                }

                current.clear();
                if self.policy == OverflowPolicy::CarryForward {
                    current.push_str(sentence);
                    window.restart(sentence.trim().to_string());
                }
            }
            pb.inc(1);
        }

        if self.flush_trailing {
            let rest = current.trim();
            if !rest.is_empty() {
                chunks.push(rest.to_string());
            }
        }

        Ok(chunks)
    }
}
