//! Per-sentence scoring used by the filter passes
//!
//! All ratios carry small additive offsets so a sentence with no short
//! words, no non-digit words or no words at all never divides by zero.

use regex::Regex;
use std::sync::OnceLock;

static RE_DIGIT: OnceLock<Regex> = OnceLock::new();

/// Word tallies for the letter-length score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthCounts {
    /// Words longer than one character
    pub long: usize,
    /// Single-character words
    pub short: usize,
}

impl LengthCounts {
    pub fn of(sentence: &str) -> Self {
        words(sentence).fold(Self::default(), |mut counts, word| {
            if word.chars().count() > 1 {
                counts.long += 1;
            } else {
                counts.short += 1;
            }
            counts
        })
    }

    pub fn words(&self) -> usize {
        self.long + self.short
    }

    /// Mean of the long/short ratio and the non-short share
    pub fn score(&self) -> f64 {
        let long = self.long as f64;
        let short = self.short as f64;
        let ratio = (long + 0.5) / (short + 0.001);
        let ratio_len = 1.0 - (short / (self.words() as f64 + 0.1));
        (ratio + ratio_len) / 2.0
    }
}

/// Word tallies for the digit-density score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitCounts {
    /// Words containing at least one decimal digit
    pub digit: usize,
    /// Words without any decimal digit
    pub not_digit: usize,
}

impl DigitCounts {
    pub fn of(sentence: &str) -> Self {
        words(sentence).fold(Self::default(), |mut counts, word| {
            if has_digit(word) {
                counts.digit += 1;
            } else {
                counts.not_digit += 1;
            }
            counts
        })
    }

    pub fn ratio(&self) -> f64 {
        self.digit as f64 / (self.not_digit as f64 + 0.01)
    }
}

/// True if any character is a Unicode decimal digit (`Nd`)
pub fn has_digit(text: &str) -> bool {
    RE_DIGIT
        .get_or_init(|| Regex::new(r"\d").expect("digit pattern compiles"))
        .is_match(text)
}

/// Whitespace-delimited words
///
/// Besides Unicode `White_Space`, the ASCII information separators
/// U+001C..U+001F also split words, as they do in scanned-text exports.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_word_separator).filter(|word| !word.is_empty())
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod heuristics_tests {
    use super::*;

    #[test]
    fn test_length_counts() {
        let counts = LengthCounts::of("h e j  hello world");
        assert_eq!(counts, LengthCounts { long: 2, short: 3 });
        assert_eq!(counts.words(), 5);
    }

    #[test]
    fn test_length_counts_multibyte_letter_is_short() {
        // "å" is two bytes but one character
        let counts = LengthCounts::of("p å");
        assert_eq!(counts, LengthCounts { long: 0, short: 2 });
    }

    #[test]
    fn test_score_empty_sentence_is_finite() {
        let score = LengthCounts::of("").score();
        assert!(score.is_finite());
        // (0.5 / 0.001 + 1.0) / 2
        assert!((score - 250.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_all_short() {
        let score = LengthCounts::of("a b c d e f g h").score();
        // ratio = 0.5 / 8.001, ratio_len = 1 - 8 / 8.1
        let expected = (0.5 / 8.001 + (1.0 - 8.0 / 8.1)) / 2.0;
        assert!((score - expected).abs() < 1e-12);
        assert!(score < 0.65);
    }

    #[test]
    fn test_digit_ratio() {
        let counts = DigitCounts::of("1 2 3 4 5 6 word");
        assert_eq!(counts, DigitCounts { digit: 6, not_digit: 1 });
        assert!((counts.ratio() - 6.0 / 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_digit_anywhere_in_word() {
        assert!(has_digit("abc1"));
        assert!(has_digit("år1850."));
        assert!(!has_digit("inga siffror"));
        assert!(!has_digit("½"));
        assert!(has_digit("٣"));
        assert_eq!(DigitCounts::of("a1 b c2").digit, 2);
    }

    #[test]
    fn test_digit_outside_common_blocks() {
        // Limbu, mathematical bold, Ol Chiki, Vai, New Tai Lue
        for digit in ["\u{1946}", "\u{1D7CE}", "\u{1C50}", "\u{A620}", "\u{19D0}"] {
            assert!(has_digit(digit), "{:?} should count as a digit", digit);
        }
        let counts = DigitCounts::of("𝟏 𝟐 𝟑 𝟒 𝟓 𝟔 word");
        assert_eq!(counts, DigitCounts { digit: 6, not_digit: 1 });
    }

    #[test]
    fn test_words_split_on_information_separators() {
        let split: Vec<&str> = words("ett\u{1c}två\u{1f} tre\u{3000}fyra  ").collect();
        assert_eq!(split, vec!["ett", "två", "tre", "fyra"]);
        assert_eq!(words("").count(), 0);
        assert_eq!(LengthCounts::of("a\u{1d}b\u{1e}c"), LengthCounts { long: 0, short: 3 });
    }
}
