//! Interstitial dismissal

use std::time::Duration;
use tracing::{debug, info};

use crate::driver::PageDriver;

/// How to recognise one kind of overlay and close it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissStrategy {
    pub name: &'static str,
    /// Overlay root; must be present and visible for the strategy to apply
    pub target: &'static str,
    /// Close control; `None` goes straight to the cancel key
    pub close: Option<&'static str>,
}

pub const CANCEL_KEY: &str = "Escape";

/// Tried in order; the first match is the only one acted on.
pub const DISMISS_STRATEGIES: &[DismissStrategy] = &[
    DismissStrategy {
        name: "contextual sign-in modal",
        target: ".contextual-sign-in-modal",
        close: Some(".contextual-sign-in-modal__modal-dismiss"),
    },
    DismissStrategy {
        name: "sign-in overlay",
        target: ".modal__overlay--visible",
        close: Some("button.modal__dismiss"),
    },
    DismissStrategy {
        name: "cookie consent",
        target: "#artdeco-global-alert-container",
        close: Some("button[action-type=\"ACCEPT\"]"),
    },
    DismissStrategy {
        name: "generic dialog",
        target: "[role=\"dialog\"]",
        close: Some("[role=\"dialog\"] button[aria-label=\"Dismiss\"]"),
    },
    DismissStrategy {
        name: "top-level modal",
        target: ".top-level-modal-container",
        close: None,
    },
];

/// Dismiss at most one overlay using [`DISMISS_STRATEGIES`].
///
/// Returns the name of the strategy used. Probe and click failures are
/// treated as "not present"; the controller never fails an attempt here.
pub async fn dismiss_popup<D: PageDriver + ?Sized>(
    driver: &D,
    interaction_timeout: Duration,
) -> Option<&'static str> {
    dismiss_with(driver, DISMISS_STRATEGIES, interaction_timeout).await
}

pub async fn dismiss_with<D: PageDriver + ?Sized>(
    driver: &D,
    strategies: &[DismissStrategy],
    interaction_timeout: Duration,
) -> Option<&'static str> {
    for strategy in strategies {
        if !is_showing(driver, strategy.target, interaction_timeout).await {
            continue;
        }

        let closed = match strategy.close {
            Some(close) => match driver.click(close, interaction_timeout).await {
                Ok(()) => true,
                Err(e) => {
                    debug!(popup = strategy.name, "Close control failed: {}", e);
                    false
                }
            },
            None => false,
        };

        if !closed && let Err(e) = driver.press_key(CANCEL_KEY).await {
            debug!(popup = strategy.name, "Cancel key failed: {}", e);
        }

        info!(popup = strategy.name, via_close = closed, "Dismissed popup");
        return Some(strategy.name);
    }

    debug!("No popup present");
    None
}

async fn is_showing<D: PageDriver + ?Sized>(driver: &D, selector: &str, timeout: Duration) -> bool {
    match driver.count(selector, timeout).await {
        Ok(0) => return false,
        Ok(_) => {}
        Err(e) => {
            debug!(selector, "Popup probe failed: {}", e);
            return false;
        }
    }
    driver.is_visible(selector, timeout).await.unwrap_or_else(|e| {
        debug!(selector, "Popup visibility check failed: {}", e);
        false
    })
}
