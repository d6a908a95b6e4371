use regex::Regex;
use std::sync::LazyLock;

/// Artist/title parsed from a file stem.
#[derive(Debug, PartialEq)]
pub struct ParsedName {
    pub artist: String,
    pub title: String,
}

// Pattern 1: spaced separator — "Artist - Title"
// Preferred so artists with hyphenated names (AC-DC) still parse.
static SPACED_DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<artist>.+?)\s+-\s+(?P<title>.+)$").unwrap()
});

// Pattern 2: bare dash fallback — split at the first '-'
static BARE_DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<artist>[^-]+)-(?P<title>.+)$").unwrap()
});

/// Parse a file stem of the form `Artist - Title` into its identity pair,
/// trimming both sides. Returns `None` when there is no dash or either
/// side is empty after trimming.
pub fn parse_song_name(stem: &str) -> Option<ParsedName> {
    let caps = SPACED_DASH_RE
        .captures(stem)
        .or_else(|| BARE_DASH_RE.captures(stem))?;

    let artist = caps.name("artist").unwrap().as_str().trim();
    let title = caps.name("title").unwrap().as_str().trim();
    if artist.is_empty() || title.is_empty() {
        return None;
    }

    Some(ParsedName {
        artist: artist.to_string(),
        title: title.to_string(),
    })
}
