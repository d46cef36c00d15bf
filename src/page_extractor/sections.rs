//! Labeled profile sections and one-line experience parsing
//!
//! Both halves are best-effort: a missing section is an empty list, and a
//! line that does not split cleanly still produces an entry.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::js_scripts::SECTION_ITEMS_FN;
use crate::driver::PageDriver;
use crate::record::ExperienceEntry;
use crate::utils::constants::MIN_SECTION_ITEM_CHARS;
use crate::utils::text::{dedupe_preserving_order, normalize_whitespace};

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?";

/// `[Month] YYYY - (Present | Month YYYY)`
static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:{MONTH}\s+)?\d{{4}}\s*[-–—]\s*(?:Present|{MONTH}\s+\d{{4}})"
    ))
    .expect("date range regex")
});

/// `N year(s) [N month(s)]`, also the abbreviated `yr`/`mo` forms
static TOTAL_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s+(?:years?|yrs?)\b(?:\s+\d+\s+(?:months?|mos?)\b)?").expect("duration regex")
});

/// List items of the section headed `label`.
///
/// The heading match is exact after whitespace collapsing, trimming and
/// lowercasing. No heading, no enclosing section, or a failed evaluation all
/// give an empty list.
pub async fn section_by_heading<D: PageDriver + ?Sized>(driver: &D, label: &str) -> Vec<String> {
    let value = match driver
        .evaluate_function(SECTION_ITEMS_FN, vec![Value::String(label.to_string())])
        .await
    {
        Ok(value) => value,
        Err(e) => {
            warn!(section = label, "Section lookup failed: {}", e);
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        debug!(section = label, "Section not present");
        return Vec::new();
    };

    let items = clean_section_items(
        items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string)),
    );
    debug!(section = label, "{} item(s)", items.len());
    items
}

/// Normalize whitespace, drop short fragments, de-duplicate in first-seen
/// order.
pub fn clean_section_items<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    dedupe_preserving_order(
        raw.into_iter()
            .map(|item| normalize_whitespace(&item))
            .filter(|item| item.chars().count() > MIN_SECTION_ITEM_CHARS),
    )
}

pub fn parse_one_line_experience(lines: &[String]) -> Vec<ExperienceEntry> {
    lines.iter().map(|line| parse_experience_line(line)).collect()
}

/// Split one free-text experience line into role / company / dates.
///
/// The role/company boundary is the first token after the first one that
/// starts with an uppercase letter, falling back to index 1. This is often
/// wrong for multi-word roles or lowercase company names; the result is
/// still returned as-is.
pub fn parse_experience_line(line: &str) -> ExperienceEntry {
    let duration = DATE_RANGE.find(line).map(|m| m.as_str().to_string());
    let total_time = TOTAL_TIME.find(line).map(|m| m.as_str().to_string());

    let mut residual = line.to_string();
    for matched in [&duration, &total_time].into_iter().flatten() {
        residual = residual.replacen(matched.as_str(), " ", 1);
    }

    let tokens: Vec<&str> = residual.split_whitespace().collect();
    let split = tokens
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, token)| token.chars().next().is_some_and(char::is_uppercase))
        .map_or(1, |(index, _)| index)
        .min(tokens.len());

    ExperienceEntry {
        role: tokens[..split].join(" "),
        company: tokens[split..].join(" "),
        duration: duration.map(|d| normalize_whitespace(&d)),
        total_time: total_time.map(|t| normalize_whitespace(&t)),
    }
}
