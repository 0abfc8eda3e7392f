use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use super::chords::is_chord_line;
use super::clean::clean;
use super::stanzas::segment;

const SECTION_MARKERS: &[&str] = &["[chorus", "[refrain", "chorus:", "refrain:", "(chorus", "{chorus"];
const SECTION_STOP_WORDS: &[&str] = &["verse", "bridge", "intro"];

const MIN_REPEAT_LINES: usize = 2;
const MAX_REPEAT_LINES: usize = 12;

/// Which strategy produced the chorus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Marker,
    Repeated,
    Longest,
}

/// Cleaned chorus lines, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chorus {
    pub lines: Vec<String>,
    pub tier: Tier,
}

impl Chorus {
    pub fn text(&self) -> String {
        self.lines.iter().join("\n").trim().to_string()
    }
}

type Strategy = fn(&[String]) -> Option<Vec<String>>;

const TIERS: &[(Tier, Strategy)] = &[
    (Tier::Marker, by_marker),
    (Tier::Repeated, by_repetition),
    (Tier::Longest, by_length),
];

/// Try each tier in order; first non-empty result wins.
pub fn locate(lines: &[String]) -> Option<Chorus> {
    TIERS.iter().find_map(|&(tier, strategy)| {
        let found = strategy(lines).filter(|l| !l.is_empty())?;
        debug!(?tier, lines = found.len(), "chorus located");
        Some(Chorus { lines: found, tier })
    })
}

/// Tier 1: lines following an explicit `[Chorus]` / `Chorus:` style marker.
fn by_marker(lines: &[String]) -> Option<Vec<String>> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_marker(line))
        .find_map(|(i, _)| {
            let body = marked_section(&lines[i + 1..]);
            let cleaned = clean(&body);
            (!cleaned.is_empty()).then_some(cleaned)
        })
}

fn is_marker(line: &str) -> bool {
    let lower = line.to_lowercase();
    SECTION_MARKERS.iter().any(|m| lower.contains(m))
}

/// Collect lines up to the next blank line or section heading, skipping chords.
fn marked_section(rest: &[String]) -> Vec<&str> {
    let mut body = Vec::new();
    for raw in rest {
        let s = raw.trim();
        if s.is_empty() || (s.starts_with('[') && s.ends_with(']')) {
            break;
        }
        let lower = s.to_lowercase();
        if SECTION_STOP_WORDS.iter().any(|w| lower.starts_with(w)) {
            break;
        }
        if !is_chord_line(raw) {
            body.push(raw.as_str());
        }
    }
    body
}

struct RepeatCandidate {
    count: usize,
    first: usize,
    line_count: usize,
}

/// Tier 2: the most repeated stanza of reasonable size.
fn by_repetition(lines: &[String]) -> Option<Vec<String>> {
    let stanzas = cleaned_stanzas(lines);

    // Insertion order decides full ties
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, RepeatCandidate> = HashMap::new();
    for (idx, stanza) in stanzas.iter().enumerate() {
        let key = stanza.iter().join("\n").trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        seen.entry(key.clone())
            .and_modify(|c| c.count += 1)
            .or_insert_with(|| {
                order.push(key);
                RepeatCandidate {
                    count: 1,
                    first: idx,
                    line_count: stanza.len(),
                }
            });
    }

    let mut best: Option<&RepeatCandidate> = None;
    for key in &order {
        let c = &seen[key];
        if c.count < 2 || !(MIN_REPEAT_LINES..=MAX_REPEAT_LINES).contains(&c.line_count) {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => c.count > b.count || (c.count == b.count && c.line_count > b.line_count),
        };
        if better {
            best = Some(c);
        }
    }

    best.map(|c| stanzas[c.first].clone())
}

/// Tier 3: the longest stanza by characters, then by line count.
fn by_length(lines: &[String]) -> Option<Vec<String>> {
    let mut best: Option<(usize, usize, Vec<String>)> = None;
    for stanza in cleaned_stanzas(lines) {
        let chars = stanza.iter().join("\n").chars().count();
        let count = stanza.len();
        let better = best
            .as_ref()
            .map_or(true, |(c, n, _)| (chars, count) > (*c, *n));
        if better {
            best = Some((chars, count, stanza));
        }
    }
    best.map(|(_, _, stanza)| stanza)
}

fn cleaned_stanzas(lines: &[String]) -> Vec<Vec<String>> {
    segment(lines)
        .iter()
        .map(|s| clean(s))
        .filter(|s| !s.is_empty())
        .collect()
}
