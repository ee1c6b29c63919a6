use indicatif::ProgressBar;

use crate::cleaner::heuristics::words;

/// Accumulate sentences until their word count exceeds `seq_length`
pub(crate) fn chunk_by_word_budget<S: AsRef<str>>(
    sentences: &[S],
    seq_length: usize,
    flush_trailing: bool,
    pb: &ProgressBar,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Joining with spaces never merges words, so counts add up per sentence
    let mut current_words = 0;

    for sentence in sentences {
        let sentence = sentence.as_ref();
        current.push(' ');
        current.push_str(sentence);
        current_words += words(sentence).count();

        if current_words > seq_length {
            chunks.push(current.trim().to_string());
            current.clear();
            current_words = 0;
        }
        pb.inc(1);
    }

    if flush_trailing {
        let rest = current.trim();
        if !rest.is_empty() {
            chunks.push(rest.to_string());
        }
    }

    chunks
}

#[cfg(test)]
mod word_budget_tests {
    use super::*;

    fn run(sentences: &[&str], seq_length: usize) -> Vec<String> {
        chunk_by_word_budget(sentences, seq_length, false, &ProgressBar::hidden())
    }

    #[test]
    fn test_emits_after_crossing_budget() {
        let chunks = run(&["one two", "three four", "five six", "seven"], 3);
        // "one two three four" is 4 words > 3; "five six seven" never crosses
        assert_eq!(chunks, vec!["one two three four"]);
    }

    #[test]
    fn test_exact_budget_does_not_emit() {
        assert!(run(&["a b", "c"], 3).is_empty());
        assert_eq!(run(&["a b", "c", "d"], 3), vec!["a b c d"]);
    }

    #[test]
    fn test_single_long_sentence_is_its_own_chunk() {
        let chunks = run(&["  a b c d e  ", "f"], 2);
        assert_eq!(chunks, vec!["a b c d e"]);
    }

    #[test]
    fn test_information_separators_count_as_breaks() {
        // "a\x1fb" is two words, so the budget of 2 is crossed
        let chunks = run(&["a\u{1f}b", "c"], 2);
        assert_eq!(chunks, vec!["a\u{1f}b c"]);
    }

    #[test]
    fn test_flush_trailing() {
        let chunks =
            chunk_by_word_budget(&["a b c", "d"], 2, true, &ProgressBar::hidden());
        assert_eq!(chunks, vec!["a b c", "d"]);
    }

    #[test]
    fn test_flush_trailing_skips_blank_rest() {
        let chunks = chunk_by_word_budget(&["a b c", "  "], 2, true, &ProgressBar::hidden());
        assert_eq!(chunks, vec!["a b c"]);
    }
}
