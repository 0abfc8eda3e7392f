use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::parser::Document;

const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

/// Resolve a directory or glob pattern into document paths, then apply `limit`.
pub fn resolve(input: &str, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let path = Path::new(input);
    let mut files = if path.is_dir() {
        list_dir(path)?
    } else {
        glob_paths(input)?
    };

    if let Some(n) = limit.filter(|n| *n > 0) {
        files.truncate(n);
    }
    debug!(input, count = files.len(), "resolved input files");
    Ok(files)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && has_markup_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern).with_context(|| format!("bad input pattern {pattern:?}"))? {
        match entry {
            Ok(p) if p.is_file() => files.push(p),
            Ok(_) => {}
            Err(e) => warn!("skipping unreadable path: {}", e),
        }
    }
    Ok(files)
}

fn has_markup_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MARKUP_EXTENSIONS.iter().any(|m| e.eq_ignore_ascii_case(m)))
}

/// Read a file as markup. Invalid UTF-8 is replaced rather than rejected.
pub fn load(path: &Path) -> Result<Document, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document {
        source_name: path.display().to_string(),
        markup: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "<pre>x</pre>").unwrap();
    }

    #[test]
    fn directory_keeps_markup_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.html", "a.HTM", "notes.txt", "c.htm"] {
            touch(tmp.path(), name);
        }
        std::fs::create_dir(tmp.path().join("sub.html")).unwrap();

        let files = resolve(tmp.path().to_str().unwrap(), None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.HTM", "b.html", "c.htm"]);
    }

    #[test]
    fn limit_truncates_before_processing() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["1.html", "2.html", "3.html"] {
            touch(tmp.path(), name);
        }
        let dir = tmp.path().to_str().unwrap();
        assert_eq!(resolve(dir, Some(2)).unwrap().len(), 2);
        assert_eq!(resolve(dir, Some(0)).unwrap().len(), 3);
    }

    #[test]
    fn glob_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["song1.html", "song2.html", "other.txt"] {
            touch(tmp.path(), name);
        }
        let pattern = format!("{}/song*.html", tmp.path().display());
        assert_eq!(resolve(&pattern, None).unwrap().len(), 2);
    }

    #[test]
    fn lossy_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.html");
        std::fs::write(&path, b"<pre>caf\xe9</pre>").unwrap();
        let doc = load(&path).unwrap();
        assert!(doc.markup.starts_with("<pre>caf"));

        let missing = load(&tmp.path().join("missing.html")).unwrap_err();
        assert_eq!(missing.kind(), "io");
    }
}
