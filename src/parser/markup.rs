use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TITLE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[-|]\s").unwrap());

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// Containers that usually hold the lyric/tab body, in priority order.
const CONTENT_SELECTORS: &[&str] = &[
    "pre",
    "div.lyrics",
    "div#lyrics",
    "div#content",
    "article",
    "div#song",
];
static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Never rendered as page text.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript"];

/// Title candidate and the main text block split into lines.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub title: String,
    pub lines: Vec<String>,
}

pub fn extract(markup: &str, fallback_name: &str) -> ExtractedText {
    let doc = Html::parse_document(markup);
    let title = clean_title(&title_candidate(&doc, fallback_name));
    let lines = main_text(&doc)
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect();
    ExtractedText { title, lines }
}

fn title_candidate(doc: &Html, fallback_name: &str) -> String {
    let h1 = doc
        .select(&H1)
        .next()
        .map(|el| collapse_ws(&visible_text(el, " ")));
    let og = doc
        .select(&OG_TITLE)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string());
    let title = doc
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());

    [h1, og, title]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| source_stem(fallback_name))
}

/// "Song - Site" / "Song | Site" → "Song".
pub fn clean_title(candidate: &str) -> String {
    let first = TITLE_SPLIT_RE
        .split(candidate)
        .next()
        .unwrap_or(candidate)
        .trim();
    if first.is_empty() {
        candidate.to_string()
    } else {
        first.to_string()
    }
}

/// File name without directories or extension.
pub fn source_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn main_text(doc: &Html) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for selector in CONTENT.iter() {
        for el in doc.select(selector) {
            let text = visible_text(el, "\n");
            if !text.is_empty() {
                blocks.push(text);
            }
        }
    }

    if blocks.is_empty() {
        blocks.push(visible_text(doc.root_element(), "\n"));
    }

    // First of the longest wins
    let mut best = String::new();
    let mut best_len = 0usize;
    for block in blocks {
        let len = block.chars().count();
        if best.is_empty() || len > best_len {
            best_len = len;
            best = block;
        }
    }
    best
}

/// Text nodes under `el`, each trimmed, empties dropped, joined with `sep`.
/// Skips anything inside script/style/noscript.
fn visible_text(el: ElementRef<'_>, sep: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        let t = text.trim();
        if !t.is_empty() {
            parts.push(t);
        }
    }
    parts.join(sep).trim().to_string()
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
