use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::driver::PageDriver;
use crate::page_extractor::js_scripts::{SCROLL_POSITION_JS, SCROLL_STEP_JS};

/// Bottom edge of the viewport and document height
#[derive(Debug, Clone, Copy, Deserialize)]
struct ScrollPosition {
    bottom: f64,
    height: f64,
}

/// Slack for fractional device pixels
const BOTTOM_TOLERANCE_PX: f64 = 2.0;

/// Scroll down in at most `steps` increments, waiting `settle` after each,
/// stopping early once the viewport reaches the bottom of the document.
///
/// Returns the number of steps taken. Script failures end scrolling
/// without failing the attempt.
pub async fn scroll_to_bottom<D: PageDriver + ?Sized>(driver: &D, steps: u32, settle: Duration) -> u32 {
    for step in 1..=steps {
        if let Err(e) = driver.evaluate(SCROLL_STEP_JS).await {
            debug!(step, "Scroll step failed: {}", e);
            return step - 1;
        }
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let position = match driver.evaluate(SCROLL_POSITION_JS).await {
            Ok(value) => serde_json::from_value::<ScrollPosition>(value).ok(),
            Err(e) => {
                debug!(step, "Scroll position read failed: {}", e);
                None
            }
        };
        if let Some(pos) = position
            && pos.bottom + BOTTOM_TOLERANCE_PX >= pos.height
        {
            debug!(step, height = pos.height, "Reached bottom of document");
            return step;
        }
    }
    steps
}
