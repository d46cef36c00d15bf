//! Timeout ceilings for browser operations

use std::time::Duration;
use tracing::warn;

/// Maximum timeout for browser navigation operations (5 minutes)
/// Covers slow-loading sites, heavy SPAs, and network delays
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000;

/// Maximum timeout for element interaction operations (30 seconds)
/// Covers dynamic element loading and animations
pub const MAX_INTERACTION_TIMEOUT_MS: u64 = 30_000;

/// Clamp a navigation or page-load timeout to [`MAX_NAVIGATION_TIMEOUT_MS`],
/// logging when capped.
pub fn navigation_timeout(ms: u64) -> Duration {
    Duration::from_millis(clamp("navigation", ms, MAX_NAVIGATION_TIMEOUT_MS))
}

/// Clamp an element interaction timeout (count, visibility, click) to
/// [`MAX_INTERACTION_TIMEOUT_MS`].
pub fn interaction_timeout(ms: u64) -> Duration {
    Duration::from_millis(clamp("interaction", ms, MAX_INTERACTION_TIMEOUT_MS))
}

fn clamp(kind: &str, ms: u64, max: u64) -> u64 {
    if ms > max {
        warn!(
            "{} timeout of {}ms exceeds the {}ms ceiling ({:.1} minutes); capping",
            kind,
            ms,
            max,
            max as f64 / 60_000.0
        );
        max
    } else {
        ms
    }
}
