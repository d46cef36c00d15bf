//! Auth-wall detection
//!
//! Each signal is an independent boolean; the wall is present when any one
//! of them fires.

use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::driver::PageDriver;
use crate::utils::constants::SITE_TITLE_SUFFIX;

/// Sign-in and checkpoint redirects, as a signal name and the leading path
/// segments that identify it
pub const AUTH_URL_PATTERNS: &[(&str, &[&str])] = &[
    ("/authwall", &["authwall"]),
    ("/login", &["login"]),
    ("/uas/login", &["uas", "login"]),
    ("/checkpoint", &["checkpoint"]),
    ("/signup", &["signup"]),
];

/// Elements only rendered by sign-in forms
pub const AUTH_DOM_MARKERS: &[&str] = &[
    ".authwall-join-form",
    ".authwall-sign-in-form",
    "form.login__form",
    "input#session_key",
];

/// Lowercase phrases of sign-in page titles, matched as whole words
pub const AUTH_TITLE_KEYWORDS: &[&str] = &[
    "sign in",
    "log in",
    "sign up",
    "join linkedin",
    "security verification",
];

fn url_signals(url: &str) -> Vec<&'static str> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };
    let segments: Vec<String> = parsed
        .path_segments()
        .map(|s| s.map(str::to_ascii_lowercase).collect())
        .unwrap_or_default();

    AUTH_URL_PATTERNS
        .iter()
        .filter(|(_, prefix)| {
            segments.len() >= prefix.len() && segments.iter().zip(prefix.iter()).all(|(a, b)| a == b)
        })
        .map(|(signal, _)| *signal)
        .collect()
}

/// `phrase` occurs in `haystack` with no word character on either side.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

fn title_signals(title: &str) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let page_part = match title.rsplit_once('|') {
        Some((head, tail)) if tail.trim().eq_ignore_ascii_case(SITE_TITLE_SUFFIX) => head,
        _ => title.as_str(),
    };

    AUTH_TITLE_KEYWORDS
        .iter()
        .filter(|k| contains_phrase(page_part, k))
        .copied()
        .collect()
}

/// Every signal that fires for the given page state. Empty means no wall.
///
/// URL signals look at leading path segments only, so a profile slug can
/// never match. Title keywords only count as whole phrases in the part of the
/// title before the site suffix.
pub fn evaluate_signals(url: &str, title: &str, marker_hits: &[&'static str]) -> Vec<&'static str> {
    let mut signals = url_signals(url);
    signals.extend_from_slice(marker_hits);
    signals.extend(title_signals(title));
    signals
}

/// Read URL, title and DOM markers from the page and evaluate every signal.
///
/// A read that fails counts as that signal being false.
pub async fn detect_auth_wall<D: PageDriver + ?Sized>(
    driver: &D,
    interaction_timeout: Duration,
) -> Vec<&'static str> {
    let url = driver.current_url().await.unwrap_or_else(|e| {
        debug!("URL read failed during auth check: {}", e);
        String::new()
    });
    let title = driver.title().await.unwrap_or_else(|e| {
        debug!("Title read failed during auth check: {}", e);
        String::new()
    });

    let mut hits = Vec::new();
    for marker in AUTH_DOM_MARKERS {
        match driver.count(marker, interaction_timeout).await {
            Ok(n) if n > 0 => hits.push(*marker),
            Ok(_) => {}
            Err(e) => debug!(marker, "Auth marker probe failed: {}", e),
        }
    }

    let signals = evaluate_signals(&url, &title, &hits);
    debug!(url = %url, title = %title, ?signals, "Auth check");
    signals
}
