use std::sync::LazyLock;

use regex::Regex;

static COMMA_PRECINCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*,\s*precinct\b").expect("valid regex")
});

static CITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:city\s+of\s+)+").expect("valid regex")
});

static TOWNSHIP_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s+(?:charter\s+)?township)+$").expect("valid regex")
});

/// Collapse runs of whitespace to single spaces and trim the ends.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip administrative boilerplate from a boundary name so it lines up with
/// score keys: drops a leading "City of", a trailing "Township"/"Charter Township",
/// and rewrites ", Precinct N" as " Precinct N". Idempotent.
pub fn normalize(name: &str) -> String {
    let s = collapse_whitespace(name);
    let s = COMMA_PRECINCT.replace_all(&s, " Precinct");
    let s = CITY_PREFIX.replace(&s, "");
    let s = TOWNSHIP_SUFFIX.replace(&s, "");
    collapse_whitespace(&s)
}

/// Lowercase with all whitespace removed.
#[inline]
pub(crate) fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}
