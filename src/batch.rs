use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::IngestError;
use crate::input;
use crate::parser::{self, record::SongRecord};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Totals reported after a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchCounts {
    pub written: usize,
    pub skipped: usize,
    /// Skips grouped by error kind.
    pub skip_reasons: BTreeMap<&'static str, usize>,
}

impl BatchCounts {
    fn skip(&mut self, err: &IngestError) {
        self.skipped += 1;
        *self.skip_reasons.entry(err.kind()).or_default() += 1;
    }

    pub fn print(&self, output: &Path) {
        println!(
            "Wrote {} records to {}; skipped {} files.",
            self.written,
            output.display(),
            self.skipped
        );
    }
}

fn process_one(path: &Path, include_lyrics: bool) -> Result<SongRecord, IngestError> {
    let doc = input::load(path)?;
    parser::process_document(&doc, include_lyrics)
}

#[cfg(feature = "rayon")]
fn process_chunk(chunk: &[PathBuf], include_lyrics: bool) -> Vec<Result<SongRecord, IngestError>> {
    chunk
        .par_iter()
        .map(|p| process_one(p, include_lyrics))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn process_chunk(chunk: &[PathBuf], include_lyrics: bool) -> Vec<Result<SongRecord, IngestError>> {
    chunk
        .iter()
        .map(|p| process_one(p, include_lyrics))
        .collect()
}

/// Process `files` and write one JSON record per line to `output`,
/// in input order. Per-document failures are counted, never fatal.
pub fn run(files: &[PathBuf], output: &Path, settings: &Settings) -> Result<BatchCounts> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let mut out = BufWriter::new(file);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = BatchCounts::default();
    for chunk in files.chunks(settings.chunk_size.max(1)) {
        for result in process_chunk(chunk, settings.include_lyrics) {
            match result {
                Ok(record) => {
                    serde_json::to_writer(&mut out, &record)?;
                    out.write_all(b"\n")?;
                    counts.written += 1;
                }
                Err(e) => {
                    warn!("skipped: {}", e);
                    counts.skip(&e);
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }
    out.flush()?;

    pb.finish_and_clear();
    info!(
        written = counts.written,
        skipped = counts.skipped,
        reasons = ?counts.skip_reasons,
        "batch finished"
    );
    Ok(counts)
}

/// Read records back from a JSONL file, ignoring blank lines.
pub fn read_records(path: &Path) -> Result<Vec<SongRecord>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            serde_json::from_str(l).with_context(|| format!("{}:{}", path.display(), i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn writes_in_input_order_and_counts_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![
            write(tmp.path(), "b.html", "<h1>Second</h1><pre>two two\ntwo</pre>"),
            write(tmp.path(), "a.html", "<h1>First</h1><pre>one one\none</pre>"),
            write(tmp.path(), "chords.html", "<pre>Am G\n\nC F</pre>"),
            write(tmp.path(), "blank.html", "   "),
            tmp.path().join("missing.html"),
        ];
        let output = tmp.path().join("out/songs.jsonl");
        let settings = Settings {
            chunk_size: 2,
            include_lyrics: false,
        };

        let counts = run(&files, &output, &settings).unwrap();
        assert_eq!(counts.written, 2);
        assert_eq!(counts.skipped, 3);
        assert_eq!(counts.skip_reasons.get("no_chorus"), Some(&1));
        assert_eq!(counts.skip_reasons.get("markup"), Some(&1));
        assert_eq!(counts.skip_reasons.get("io"), Some(&1));

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "{\"title\":\"Second\",\"chorus\":\"two two\\ntwo\"}\n{\"title\":\"First\",\"chorus\":\"one one\\none\"}\n"
        );
    }

    #[test]
    fn empty_input_still_creates_output() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("nested/dir/songs.jsonl");
        let counts = run(&[], &output, &Settings::default()).unwrap();
        assert_eq!(counts, BatchCounts::default());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
        assert!(read_records(&output).unwrap().is_empty());
    }

    #[test]
    fn records_read_back_identically() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![
            std::path::PathBuf::from("tests/fixtures/champions.html"),
            std::path::PathBuf::from("tests/fixtures/tab_site.html"),
        ];
        let output = tmp.path().join("songs.jsonl");
        let counts = run(&files, &output, &Settings::default()).unwrap();
        assert_eq!(counts.written, 2);

        let records = read_records(&output).unwrap();
        assert_eq!(records.len(), 2);
        let direct = process_one(&files[1], true).unwrap();
        assert_eq!(records[1], direct);
        assert!(records.iter().all(|r| r.bpm.map_or(true, |b| (30..=300).contains(&b))));
    }
}
