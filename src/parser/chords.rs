use std::sync::LazyLock;

use regex::Regex;

/// One chord token: root, accidental, quality, extension, slash bass.
pub const CHORD_TOKEN: &str = r"[A-G][#b]?(?:m|maj|min|sus|dim|aug)?\d*(?:/[A-G][#b]?)?";

static CHORD_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{CHORD_TOKEN}(?:\s+{CHORD_TOKEN})*$")).unwrap());
static CHORD_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{CHORD_TOKEN}$")).unwrap());

/// True when the line is chord notation rather than lyrics.
pub fn is_chord_line(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return false;
    }
    if CHORD_LINE_RE.is_match(s) {
        return true;
    }

    // Mostly-chord lines, e.g. "C  G  Am  F  (x2)"
    let mut total = 0usize;
    let mut chordish = 0usize;
    for token in s.split_whitespace() {
        total += 1;
        if CHORD_TOKEN_RE.is_match(token) {
            chordish += 1;
        }
    }
    chordish >= min_chord_tokens(total)
}

/// max(2, ceil(0.6 * n)) without going through floats.
fn min_chord_tokens(total: usize) -> usize {
    ((total * 3).div_ceil(5)).max(2)
}
