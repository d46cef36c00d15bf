//! Element polling for overlay controls rendered after their dialog

use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use chromiumoxide::Page;
use chromiumoxide::element::Element;

use crate::browser::{BrowserError, BrowserResult};

const FIRST_POLL: Duration = Duration::from_millis(50);
const MAX_POLL: Duration = Duration::from_millis(500);

/// Look `selector` up until it exists or `timeout` elapses.
///
/// The poll interval doubles from 50ms up to 500ms. At least one lookup is
/// made even with a zero timeout.
pub async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> BrowserResult<Element> {
    let deadline = Instant::now() + timeout;
    let mut interval = FIRST_POLL;
    let mut lookups = 0u32;

    loop {
        lookups += 1;
        match page.find_element(selector).await {
            Ok(element) => return Ok(element),
            Err(e) => trace!(selector, lookups, "Element not there yet: {}", e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(BrowserError::Timeout(format!(
                "'{selector}' did not appear within {}ms ({lookups} lookups)",
                timeout.as_millis()
            )));
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
        interval = (interval * 2).min(MAX_POLL);
    }
}
