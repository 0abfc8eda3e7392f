use std::sync::LazyLock;

use regex::Regex;

use super::chords::{is_chord_line, CHORD_TOKEN};

static INLINE_CHORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\[{CHORD_TOKEN}\]")).unwrap());
static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Drop chord lines, strip inline `[Am]` tags, normalize whitespace, drop empties.
pub fn clean<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines.iter().filter_map(|l| clean_line(l.as_ref())).collect()
}

fn clean_line(line: &str) -> Option<String> {
    if is_chord_line(line) {
        return None;
    }

    // "[[C]G]" only becomes "[G]" after one pass
    let mut text = line.to_string();
    while INLINE_CHORD_RE.is_match(&text) {
        text = INLINE_CHORD_RE.replace_all(&text, "").into_owned();
    }

    let text = MULTI_SPACE_RE.replace_all(&text, " ").trim().to_string();
    // "[C] G Am" is a chord line once the tag is gone
    if text.is_empty() || is_chord_line(&text) {
        return None;
    }
    Some(text)
}
