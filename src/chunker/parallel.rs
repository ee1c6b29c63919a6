use rayon::prelude::*;
use std::ops::Range;

use super::token_budget::TokenBudget;
use crate::error::{PrepError, Result};
use crate::progress;

/// Split `len` items into `parts` contiguous, near-equal ranges
///
/// The first `len % parts` ranges get one extra item. Ranges are empty when
/// there are more parts than items.
pub fn partition_bounds(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }

    let base = len / parts;
    let extra = len % parts;
    let mut start = 0;

    (0..parts)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Run the token-budget strategy over each partition in a worker pool
pub(crate) fn chunk_partitions<S: AsRef<str> + Sync>(
    sentences: &[S],
    workers: usize,
    budget: &TokenBudget<'_>,
    show_progress: bool,
) -> Result<Vec<String>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("chunker-{}", i))
        .build()
        .map_err(|e| PrepError::WorkerPool(e.to_string()))?;

    let bounds = partition_bounds(sentences.len(), workers);
    let pb = progress::bar(
        sentences.len(),
        format!(
            "Chunking (using {} workers) into token_seq_length {}",
            workers, budget.limit
        ),
        show_progress,
    );

    let per_partition: Vec<Result<Vec<String>>> = pool.install(|| {
        bounds
            .par_iter()
            .map(|range| budget.chunk(&sentences[range.clone()], &pb))
            .collect()
    });
    pb.finish_and_clear();

    // Report the earliest failing partition
    let mut chunks = Vec::new();
    for partition in per_partition {
        chunks.extend(partition?);
    }
    Ok(chunks)
}

#[cfg(test)]
mod partition_tests {
    use super::*;

    fn sizes(len: usize, parts: usize) -> Vec<usize> {
        partition_bounds(len, parts).iter().map(|r| r.len()).collect()
    }

    #[test]
    fn test_even_split() {
        assert_eq!(sizes(12, 4), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_remainder_goes_first() {
        assert_eq!(sizes(10, 3), vec![4, 3, 3]);
        assert_eq!(sizes(11, 4), vec![3, 3, 3, 2]);
    }

    #[test]
    fn test_more_parts_than_items() {
        assert_eq!(sizes(2, 4), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_bounds_are_contiguous() {
        let bounds = partition_bounds(17, 5);
        assert_eq!(bounds.first().map(|r| r.start), Some(0));
        assert_eq!(bounds.last().map(|r| r.end), Some(17));
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_zero_parts() {
        assert!(partition_bounds(5, 0).is_empty());
    }
}
