pub mod chords;
pub mod chorus;
pub mod clean;
pub mod markup;
pub mod metadata;
pub mod record;
pub mod stanzas;

use tracing::debug;

use crate::error::IngestError;
use record::SongRecord;

/// Raw markup plus the name it was loaded from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source_name: String,
    pub markup: String,
}

/// markup → (title, lines) → chorus + metadata → record.
pub fn process_document(doc: &Document, include_lyrics: bool) -> Result<SongRecord, IngestError> {
    if doc.markup.trim().is_empty() {
        return Err(IngestError::markup(&doc.source_name, "empty document"));
    }

    let extracted = markup::extract(&doc.markup, &doc.source_name);
    if extracted.lines.iter().all(|l| l.trim().is_empty()) {
        return Err(IngestError::markup(&doc.source_name, "no visible text"));
    }

    let chorus = chorus::locate(&extracted.lines).ok_or_else(|| IngestError::ChorusAbsent {
        source_name: doc.source_name.clone(),
    })?;

    let full_text = extracted.lines.join("\n");
    let meta = metadata::extract(&doc.markup, &full_text);
    debug!(
        source = %doc.source_name,
        tier = ?chorus.tier,
        bpm = ?meta.bpm,
        "document processed"
    );

    record::assemble(&extracted.title, &extracted.lines, &chorus, meta, include_lyrics)
        .ok_or_else(|| IngestError::markup(&doc.source_name, "empty title"))
}

// ── Tests ──
