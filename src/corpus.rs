//! Reading and writing sentence sequences
//!
//! Plain text files hold one sentence per line. JSON Lines files hold one
//! object per line with the sentence in its `text` field.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{PrepError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One entry per line
    #[default]
    Text,
    /// `{"text": ...}` per line
    Jsonl,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    text: String,
}

/// Read sentences from a file, or from every corpus file under a directory
///
/// Directory entries are read in path order. Blank lines are skipped.
pub fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let files = if path.is_dir() {
        collect_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut sentences = Vec::new();
    for file in &files {
        let before = sentences.len();
        read_file(file, &mut sentences)?;
        debug!(
            "Read {} sentences from {}",
            sentences.len() - before,
            file.display()
        );
    }

    info!(
        "Loaded {} sentences from {} file(s)",
        sentences.len(),
        files.len()
    );
    Ok(sentences)
}

/// Keep only the first `limit` sentences
pub fn truncate(mut sentences: Vec<String>, limit: Option<usize>) -> Vec<String> {
    if let Some(limit) = limit {
        sentences.truncate(limit);
    }
    sentences
}

/// Write lines in the given format, creating or replacing the file
pub fn write_lines(path: &Path, lines: &[String], format: OutputFormat) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, lines, format).map_err(|e| PrepError::io(path, e))?;
    writer.flush().map_err(|e| PrepError::io(path, e))?;

    info!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Write lines in the given format to any writer
pub fn write_to<W: Write>(writer: &mut W, lines: &[String], format: OutputFormat) -> std::io::Result<()> {
    for line in lines {
        match format {
            OutputFormat::Text => {
                // Keep one entry per line even if an entry spans lines
                writeln!(writer, "{}", line.replace('\n', " "))?;
            }
            OutputFormat::Jsonl => {
                let record = Record { text: line.clone() };
                serde_json::to_writer(&mut *writer, &record)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}

fn is_corpus_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("txt") | Some("jsonl")
    )
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            PrepError::io(path, source)
        })?;

        if entry.file_type().is_file() && is_corpus_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn read_file(path: &Path, sentences: &mut Vec<String>) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
    let jsonl = path.extension().and_then(|ext| ext.to_str()) == Some("jsonl");

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if jsonl {
            let record: Record = serde_json::from_str(line).map_err(|source| PrepError::Json {
                line: idx + 1,
                source,
            })?;
            sentences.push(record.text);
        } else {
            sentences.push(line.to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
mod corpus_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, "Första meningen.\n\n  \nAndra meningen.\n").unwrap();

        let sentences = read_sentences(&path).unwrap();
        assert_eq!(sentences, vec!["Första meningen.", "Andra meningen."]);
    }

    #[test]
    fn test_read_jsonl_text_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.jsonl");
        fs::write(&path, "{\"text\": \"ett\"}\n{\"text\": \"två\", \"id\": 2}\n").unwrap();

        let sentences = read_sentences(&path).unwrap();
        assert_eq!(sentences, vec!["ett", "två"]);
    }

    #[test]
    fn test_read_jsonl_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"text\": \"ok\"}\nnot json\n").unwrap();

        let result = read_sentences(&path);
        assert!(matches!(result, Err(PrepError::Json { line: 2, .. })));
    }

    #[test]
    fn test_read_directory_in_path_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "b1\nb2\n").unwrap();
        fs::write(dir.path().join("a.txt"), "a1\n").unwrap();
        fs::write(dir.path().join("nested").join("c.jsonl"), "{\"text\": \"c1\"}\n").unwrap();
        fs::write(dir.path().join("ignored.csv"), "x\n").unwrap();

        let sentences = read_sentences(dir.path()).unwrap();
        assert_eq!(sentences, vec!["a1", "b1", "b2", "c1"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_sentences(Path::new("/nonexistent/corpus.txt"));
        assert!(matches!(result, Err(PrepError::Io { .. })));
    }

    #[test]
    fn test_truncate() {
        let sentences = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(truncate(sentences.clone(), Some(2)), vec!["a", "b"]);
        assert_eq!(truncate(sentences.clone(), None).len(), 3);
        assert_eq!(truncate(sentences, Some(10)).len(), 3);
    }

    #[test]
    fn test_write_text_and_jsonl() {
        let lines = vec!["rad ett".to_string(), "rad\ntvå".to_string()];

        let mut text = Vec::new();
        write_to(&mut text, &lines, OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "rad ett\nrad två\n");

        let mut jsonl = Vec::new();
        write_to(&mut jsonl, &lines, OutputFormat::Jsonl).unwrap();
        assert_eq!(
            String::from_utf8(jsonl).unwrap(),
            "{\"text\":\"rad ett\"}\n{\"text\":\"rad\\ntvå\"}\n"
        );
    }

    #[test]
    fn test_jsonl_written_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.jsonl");
        let lines = vec!["första".to_string(), "andra".to_string()];

        write_lines(&path, &lines, OutputFormat::Jsonl).unwrap();
        assert_eq!(read_sentences(&path).unwrap(), lines);
    }
}
