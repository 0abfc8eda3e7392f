use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

pub const MIN_BPM: u32 = 30;
pub const MAX_BPM: u32 = 300;

/// Textual tempo notations, highest priority first. ASCII digits only.
static BPM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:tempo|bpm)\s*[:=]?\s*([0-9]{2,3})\b",
        r"(?i)\b([0-9]{2,3})\s*bpm\b",
        r"[♩♪]\s*[:=]?\s*([0-9]{2,3})\b",
        r"(?i)\bq\s*[:=]\s*([0-9]{2,3})\b",
        r"(?i)\bmetronome\s*[:=]?\s*([0-9]{2,3})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Lower-cased marker that switches on the tab-site schema probes.
const SITE_MARKER: &str = "ultimate-guitar";

static STORE_TEMPO_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#""tempo"\s*:\s*([0-9]{2,3})"#).unwrap(),
        Regex::new(r#""bpm"\s*:\s*([0-9]{2,3})"#).unwrap(),
    ]
});
static STORE_ARTIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""artist_name"\s*:\s*"([^"]+)""#).unwrap());
static STORE_SONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""song_name"\s*:\s*"([^"]+)""#).unwrap());
static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:chords|tab|tabs)\s+by\s+(.+?)\s+@\s+Ultimate-Guitar").unwrap()
});

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
static DATA_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-content]").unwrap());
static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());

/// Best-effort metadata. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub bpm: Option<u32>,
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Site-schema fields, before range checks and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SiteFields {
    bpm: Option<String>,
    artist: Option<String>,
    title: Option<String>,
}

impl SiteFields {
    fn is_complete(&self) -> bool {
        self.bpm.is_some() && self.artist.is_some() && self.title.is_some()
    }

    /// First match of each field wins; later sources only fill gaps.
    fn scan(&mut self, text: &str) {
        if self.bpm.is_none() {
            self.bpm = STORE_TEMPO_RES
                .iter()
                .find_map(|re| re.captures(text).map(|c| c[1].to_string()));
        }
        if self.artist.is_none() {
            self.artist = first_filled(&STORE_ARTIST_RE, text);
        }
        if self.title.is_none() {
            self.title = first_filled(&STORE_SONG_RE, text);
        }
    }
}

/// First capture that is not just whitespace.
fn first_filled(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .find(|v| !v.is_empty())
}

pub fn extract(markup: &str, full_text: &str) -> Metadata {
    let site = if markup.to_lowercase().contains(SITE_MARKER) {
        site_fields(markup)
    } else {
        SiteFields::default()
    };

    let site_bpm = site.bpm.as_deref().and_then(parse_bpm);
    let bpm = site_bpm.or_else(|| scan_bpm(full_text));
    let meta = Metadata {
        bpm,
        artist: non_empty(site.artist),
        title: non_empty(site.title),
    };
    debug!(?meta, from_site = site_bpm.is_some(), "metadata");
    meta
}

/// Generic tempo scan. The first pattern that yields any in-range value
/// decides, even if a later pattern matches earlier in the text.
pub fn scan_bpm(text: &str) -> Option<u32> {
    BPM_PATTERNS.iter().find_map(|re| {
        re.captures_iter(text)
            .find_map(|caps| caps.get(1).and_then(|m| parse_bpm(m.as_str())))
    })
}

pub fn bpm_in_range(bpm: u32) -> bool {
    (MIN_BPM..=MAX_BPM).contains(&bpm)
}

fn parse_bpm(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|v| bpm_in_range(*v))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn site_fields(markup: &str) -> SiteFields {
    let doc = Html::parse_document(markup);
    let mut fields = SiteFields::default();

    for script in doc.select(&SCRIPT) {
        if fields.is_complete() {
            break;
        }
        let text: String = script.text().collect();
        if !text.is_empty() {
            fields.scan(&text);
        }
    }

    // The page store is an entity-encoded JSON attribute
    for el in doc.select(&DATA_CONTENT) {
        if fields.is_complete() {
            break;
        }
        if let Some(content) = el.value().attr("data-content") {
            fields.scan(content);
        }
    }

    if fields.title.is_none() || fields.artist.is_none() {
        let og = doc
            .select(&OG_TITLE)
            .next()
            .and_then(|el| el.value().attr("content"));
        if let Some(caps) = og.and_then(|c| OG_TITLE_RE.captures(c.trim())) {
            if fields.title.is_none() {
                fields.title = Some(caps[1].trim().to_string());
            }
            if fields.artist.is_none() {
                fields.artist = Some(caps[2].trim().to_string());
            }
        }
    }

    fields
}
