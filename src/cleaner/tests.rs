use super::*;

fn sentences(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn scan_samples() -> Vec<String> {
    sentences(&[
        "Psykologiska g å t o r hej hej ",
        "En q w e r t q e t u q t h d s  rättegång för sextio år sedan.\n",
        "I en vacker salon på ett litet l a n d t s t ä l l e nära floden, ett par mil ifrån London",
        "— Nej, troligen icke, — svarade Astley förvånad och kännande sina misstankar.",
        "— Gott Godt!",
        "heJ »» HEJ» The     quick brown    fox, Augusta på \tIsa, o c h Isa p å A u g u s t",
        "I en vac k e r s a l o n på e t t l i t e t l a n d t s t älle nära floden, ett par mil ifrån London.",
        "— God t !",
    ])
}

#[test]
fn test_letter_length_drops_spaced_out_letters() {
    let cleaner = WordCleaner::default();
    let kept = cleaner.filter_letter_length(&scan_samples());

    assert!(kept.contains(&"— Nej, troligen icke, — svarade Astley förvånad och kännande sina misstankar.".to_string()));
    assert!(kept.contains(&"— Gott Godt!".to_string()));
    assert!(kept.contains(&"— God t !".to_string()));
    assert!(!kept.iter().any(|s| s.starts_with("En q w e r t")));
    assert!(!kept.iter().any(|s| s.starts_with("I en vac k e r")));
}

#[test]
fn test_letter_length_keeps_mostly_long_words() {
    let cleaner = WordCleaner::default();
    // long=8, short=1 -> ratio 8.49, well above threshold
    let sentence = "this sentence has one x among many longer words";
    assert!(cleaner.keeps_letter_length(sentence));
}

#[test]
fn test_short_sentence_exemption() {
    let cleaner = WordCleaner::default();
    // Six single letters: score is tiny but word count is below 7
    assert!(cleaner.keeps_letter_length("a b c d e f"));
    // Seven single letters hit the threshold and are scored
    assert!(!cleaner.keeps_letter_length("a b c d e f g"));
}

#[test]
fn test_short_word_threshold_configurable() {
    let cleaner = WordCleaner::new(CleanerConfig {
        short_word_threshold: 3,
        ..CleanerConfig::default()
    })
    .unwrap();
    assert!(cleaner.keeps_letter_length("a b"));
    assert!(!cleaner.keeps_letter_length("a b c"));
}

#[test]
fn test_letter_length_idempotent() {
    let cleaner = WordCleaner::default();
    let once = cleaner.filter_letter_length(&scan_samples());
    let twice = cleaner.filter_letter_length(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_digit_density_drops_numeric_rows() {
    let cleaner = WordCleaner::default();
    let kept = cleaner.filter_digit_density(&sentences(&["1 2 3 4 5 6 word"]));
    assert!(kept.is_empty());
}

#[test]
fn test_no_digit_exemption() {
    let cleaner = WordCleaner::new(CleanerConfig {
        number_ratio: 0.0,
        ..CleanerConfig::default()
    })
    .unwrap();
    assert!(cleaner.keeps_digit_density("inga siffror här alls"));
    assert!(!cleaner.keeps_digit_density("år 1850"));
}

#[test]
fn test_digit_density_keeps_prose_with_a_year() {
    let cleaner = WordCleaner::default();
    // 1 digit word, 5 others -> 1 / 5.01
    assert!(cleaner.keeps_digit_density("Han föddes i Uppsala år 1850"));
    // 1 digit word, 1 other -> 1 / 1.01 >= 0.7
    assert!(!cleaner.keeps_digit_density("Sida 12"));
}

#[test]
fn test_clean_pipe_runs_both_passes_in_order() {
    let cleaner = WordCleaner::default();
    let input = sentences(&[
        "a b c d e f g h",
        "12 13 14 tal",
        "En helt vanlig mening utan konstigheter.",
        "Kapitel 3 börjar med en lång beskrivning av staden.",
    ]);

    let (kept, report) = cleaner.clean_with_report(&input);

    assert_eq!(
        kept,
        sentences(&[
            "En helt vanlig mening utan konstigheter.",
            "Kapitel 3 börjar med en lång beskrivning av staden.",
        ])
    );
    assert_eq!(
        report,
        CleanReport {
            input: 4,
            after_length_filter: 3,
            after_number_filter: 2,
        }
    );
}

#[test]
fn test_clean_pipe_never_grows() {
    let cleaner = WordCleaner::default();
    let input = scan_samples();
    assert!(cleaner.clean_pipe(&input).len() <= input.len());
}

#[test]
fn test_clean_pipe_empty() {
    let cleaner = WordCleaner::default();
    let input: Vec<String> = Vec::new();
    assert!(cleaner.clean_pipe(&input).is_empty());
}

#[test]
fn test_clean_pipe_accepts_str_slices() {
    let cleaner = WordCleaner::default();
    let kept = cleaner.clean_pipe(&["Hej hej", "1 2 3"]);
    assert_eq!(kept, vec!["Hej hej".to_string()]);
}

#[test]
fn test_invalid_config_rejected() {
    let result = WordCleaner::new(CleanerConfig {
        number_ratio: f64::INFINITY,
        ..CleanerConfig::default()
    });
    assert!(result.is_err());
}
