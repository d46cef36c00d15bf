//! Rendered-DOM reads for the profile top card

use serde::Deserialize;
use tracing::warn;

use super::js_scripts::DOM_SNAPSHOT_JS;
use crate::driver::PageDriver;
use crate::utils::constants::MAX_FOLLOWER_SNIPPETS;
use crate::utils::text::{dedupe_preserving_order, normalize_whitespace};

/// Raw top-card texts; any of them may be missing on a logged-out view
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomSnapshot {
    pub heading: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub current_company: Option<String>,
    pub education_top: Option<String>,
    pub subline: Vec<String>,
}

/// Evaluate the top-card script. A failed evaluation or an unexpected
/// shape yields an empty snapshot; the other sources may still resolve
/// the fields.
pub async fn read_dom_snapshot<D: PageDriver + ?Sized>(driver: &D) -> DomSnapshot {
    let value = match driver.evaluate(DOM_SNAPSHOT_JS).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Top-card DOM read failed: {}", e);
            return DomSnapshot::default();
        }
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Top-card DOM read returned an unexpected shape: {}", e);
        DomSnapshot::default()
    })
}

/// Subline snippets that mention followers or connections, normalized,
/// de-duplicated, at most [`MAX_FOLLOWER_SNIPPETS`].
pub fn followers_and_connections(subline: &[String]) -> Vec<String> {
    let matching = subline.iter().map(|s| normalize_whitespace(s)).filter(|s| {
        let lower = s.to_lowercase();
        lower.contains("follower") || lower.contains("connection")
    });
    dedupe_preserving_order(matching)
        .into_iter()
        .take(MAX_FOLLOWER_SNIPPETS)
        .collect()
}
