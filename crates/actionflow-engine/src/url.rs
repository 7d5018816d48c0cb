//! URL classification for navigation targets.
//!
//! The match is permissive on purpose: anything that loosely resembles an
//! absolute URL (a dotted host with a 2-4 character suffix, `localhost/`,
//! or an IPv4 literal, optionally wrapped in scheme, credentials, port,
//! path, query and fragment) is treated as one. A page whose name looks
//! like a domain (`test.com`) therefore classifies as a URL, and the URL
//! interpretation wins over page lookup.

use std::sync::OnceLock;

use regex::Regex;

/// Prefixes that mark a URL as already fully qualified.
pub const ACCEPTED_SCHEMES: [&str; 4] = ["http://", "https://", "mailto:", "tel:"];

// Word characters are ASCII only, matching browser `\w`.
const URL_PATTERN: &str = concat!(
    r"\(?",
    r"(?:(?:http|https|ftp|mailto|tel)://)?",
    r"(?:(?:[A-Za-z0-9_]|\.|-|:)+@)?",
    r"(?:",
    r"(?:www.)?(?:[A-Za-z0-9_]|\.|-)+\.[A-Za-z0-9_]{2,4}",
    r"|localhost/",
    r"|[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}",
    r")",
    r"(?::[0-9]*)?",
    r"(?:/?[^\s?]*/)*",
    r"(?:/?(?:[^\s?\[\]{}#]*|[^\s?\[\]{}.#]*)?(?:\.[^\s?#]*)?)?",
    r"(?:\?[^\s#\[\]]*)?",
    r"(?:#\S*)?",
    r"\)?",
);

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

/// Whether `s` looks like an absolute URL, with or without a scheme.
pub fn is_valid_url(s: &str) -> bool {
    url_pattern().is_match(s)
}

/// Whether `s` already starts with one of the [`ACCEPTED_SCHEMES`].
pub fn is_valid_scheme(s: &str) -> bool {
    ACCEPTED_SCHEMES
        .iter()
        .any(|scheme| s.starts_with(scheme))
}

/// Prefix `default_scheme` unless `url` already carries an accepted scheme.
pub fn with_default_scheme(url: String, default_scheme: &str) -> String {
    if is_valid_scheme(&url) {
        url
    } else {
        format!("{default_scheme}{url}")
    }
}
