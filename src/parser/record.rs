use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::chorus::Chorus;
use super::clean::clean;
use super::metadata::{bpm_in_range, Metadata};

/// One training example. Optional fields are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub chorus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

impl SongRecord {
    /// Prompt layout the generator is trained on.
    pub fn training_text(&self) -> String {
        let bpm_line = self
            .bpm
            .filter(|b| bpm_in_range(*b))
            .map(|b| format!("\nBPM: {b}"))
            .unwrap_or_default();
        format!(
            "Title: {}{}\nChorus:\n{}\n",
            self.title.trim(),
            bpm_line,
            self.chorus.trim()
        )
    }
}

/// Merge the pipeline outputs. `None` when title or chorus would be empty.
pub fn assemble(
    extracted_title: &str,
    lines: &[String],
    chorus: &Chorus,
    meta: Metadata,
    include_lyrics: bool,
) -> Option<SongRecord> {
    let title = meta
        .title
        .unwrap_or_else(|| extracted_title.trim().to_string());
    let chorus = chorus.text();
    if title.is_empty() || chorus.is_empty() {
        return None;
    }

    let lyrics = include_lyrics
        .then(|| clean(lines).iter().join("\n").trim().to_string())
        .filter(|l| !l.is_empty());

    Some(SongRecord {
        title,
        chorus,
        artist: meta.artist.filter(|a| !a.trim().is_empty()),
        bpm: meta.bpm.filter(|b| bpm_in_range(*b)),
        lyrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::chorus::Tier;

    fn chorus(lines: &[&str]) -> Chorus {
        Chorus {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            tier: Tier::Marker,
        }
    }

    fn doc_lines() -> Vec<String> {
        ["[Chorus]", "Am G", "We are the champions", "", "[Verse]", "la"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn override_title_and_optional_fields() {
        let meta = Metadata {
            bpm: Some(120),
            artist: Some("Queen".into()),
            title: Some("We Are The Champions".into()),
        };
        let rec = assemble("Page heading", &doc_lines(), &chorus(&["We are the champions"]), meta, true)
            .unwrap();
        assert_eq!(rec.title, "We Are The Champions");
        assert_eq!(rec.artist.as_deref(), Some("Queen"));
        assert_eq!(rec.bpm, Some(120));
        assert_eq!(
            rec.lyrics.as_deref(),
            Some("[Chorus]\nWe are the champions\n[Verse]\nla")
        );
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let rec = assemble("Song", &[], &chorus(&["la la"]), Metadata::default(), true).unwrap();
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"title":"Song","chorus":"la la"}"#);
    }

    #[test]
    fn invalid_bpm_is_dropped() {
        let meta = Metadata {
            bpm: Some(999),
            ..Default::default()
        };
        let rec = assemble("Song", &[], &chorus(&["la"]), meta, false).unwrap();
        assert_eq!(rec.bpm, None);
    }

    #[test]
    fn empty_title_rejected() {
        assert!(assemble("  ", &[], &chorus(&["la"]), Metadata::default(), true).is_none());
    }

    #[test]
    fn lyrics_can_be_disabled() {
        let rec = assemble("Song", &doc_lines(), &chorus(&["la"]), Metadata::default(), false).unwrap();
        assert_eq!(rec.lyrics, None);
    }

    #[test]
    fn json_round_trip() {
        let rec = SongRecord {
            title: "Ünïcode \"quoted\"".into(),
            chorus: "line one\nline two".into(),
            artist: Some("Band".into()),
            bpm: Some(96),
            lyrics: Some("verse\nline one\nline two".into()),
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("Ünïcode"));
        let back: SongRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn training_text_layout() {
        let mut rec = SongRecord {
            title: "Song".into(),
            chorus: "la la\nla".into(),
            artist: None,
            bpm: Some(90),
            lyrics: None,
        };
        assert_eq!(rec.training_text(), "Title: Song\nBPM: 90\nChorus:\nla la\nla\n");
        rec.bpm = None;
        assert_eq!(rec.training_text(), "Title: Song\nChorus:\nla la\nla\n");
    }
}
