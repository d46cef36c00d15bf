//! Page-state controller
//!
//! Drives one target through `Loading → PopupCheck → AuthCheck → Scrolling
//! → PopupCheck → Extracting → Success`. Any failure inside an attempt moves
//! to `Retry`; running out of attempts moves to `Failed`. Each attempt owns
//! a fresh session from the [`SessionFactory`] and closes it on every exit
//! path.

pub mod auth_wall;
pub mod popups;
pub mod retry;
pub mod scroll;

use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::driver::{PageDriver, PageSession, SessionFactory, WaitStrategy};
use crate::error::{AttemptError, ScrapeError};
use crate::page_extractor::extract_page;
use crate::page_extractor::js_scripts::READY_STATE_JS;
use crate::record::{AttemptOutcome, ProfileRecord};
use crate::utils::{interaction_timeout, navigation_timeout};

pub use auth_wall::{detect_auth_wall, evaluate_signals};
pub use popups::{DISMISS_STRATEGIES, DismissStrategy, dismiss_popup};
pub use retry::{AttemptDescriptor, AttemptPlan, RetryLedger, backoff_for};
pub use scroll::scroll_to_bottom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Loading,
    PopupCheck,
    AuthCheck,
    Scrolling,
    Extracting,
    Success,
    Retry,
    Failed,
}

impl PageState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PageState::Success | PageState::Failed)
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageState::Loading => "loading",
            PageState::PopupCheck => "popup-check",
            PageState::AuthCheck => "auth-check",
            PageState::Scrolling => "scrolling",
            PageState::Extracting => "extracting",
            PageState::Success => "success",
            PageState::Retry => "retry",
            PageState::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(state: PageState, attempt: u32) {
    info!(attempt, state = %state, "Entering state");
}

pub struct PageStateController<'a, F: SessionFactory> {
    config: &'a Config,
    factory: &'a F,
}

impl<'a, F: SessionFactory> PageStateController<'a, F> {
    pub fn new(config: &'a Config, factory: &'a F) -> Self {
        Self { config, factory }
    }

    /// Run attempts in sequence until one produces a record or the plan is
    /// exhausted.
    pub async fn run(&self, url: &str) -> Result<ProfileRecord, ScrapeError> {
        let plan = AttemptPlan::new(
            self.config.max_retries,
            Duration::from_millis(self.config.retry_backoff_ms),
        );
        let max_attempts = plan.len();
        let mut ledger = RetryLedger::default();

        for descriptor in plan {
            if !descriptor.backoff.is_zero() {
                info!(
                    attempt = descriptor.index,
                    backoff_ms = descriptor.backoff.as_millis() as u64,
                    "Backing off before retry"
                );
                tokio::time::sleep(descriptor.backoff).await;
            }
            info!(attempt = descriptor.index, max_attempts, url, "Starting attempt");

            match self.attempt(url, descriptor).await {
                Ok(record) => {
                    ledger = ledger.record(descriptor, AttemptOutcome::Success);
                    enter(PageState::Success, descriptor.index);
                    info!(
                        attempts = ledger.attempts().len(),
                        failures = ledger.failures(),
                        total_backoff_ms = ledger.total_backoff().as_millis() as u64,
                        "Run summary"
                    );
                    return Ok(record);
                }
                Err(e) => {
                    let outcome = e.outcome();
                    warn!(attempt = descriptor.index, ?outcome, "Attempt failed: {}", e);
                    ledger = ledger.record(descriptor, outcome);
                    enter(PageState::Retry, descriptor.index);
                }
            }
        }

        let attempts = ledger.into_attempts();
        enter(PageState::Failed, attempts.len() as u32);
        for attempt in &attempts {
            error!(
                attempt = attempt.attempt_index,
                outcome = ?attempt.outcome,
                backoff_ms = attempt.elapsed_backoff.as_millis() as u64,
                "Attempt history"
            );
        }
        Err(ScrapeError::ExhaustedRetries { attempts })
    }

    /// One attempt with its own session; the session is closed whatever
    /// `drive` returns.
    async fn attempt(
        &self,
        url: &str,
        descriptor: AttemptDescriptor,
    ) -> Result<ProfileRecord, AttemptError> {
        let session = self.factory.open().await?;
        let result = self.drive(&session, url, descriptor.index).await;
        session.close().await;
        result
    }

    async fn drive<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        url: &str,
        attempt: u32,
    ) -> Result<ProfileRecord, AttemptError> {
        let nav_timeout = navigation_timeout(self.config.navigation_timeout_ms);
        let load_timeout = navigation_timeout(self.config.page_load_timeout_ms);
        let ui_timeout = interaction_timeout(self.config.interaction_timeout_ms);

        enter(PageState::Loading, attempt);
        self.load(driver, url, nav_timeout, load_timeout).await?;

        enter(PageState::PopupCheck, attempt);
        dismiss_popup(driver, ui_timeout).await;

        enter(PageState::AuthCheck, attempt);
        let signals = detect_auth_wall(driver, ui_timeout).await;
        if !signals.is_empty() {
            return Err(AttemptError::AuthWallDetected { signals });
        }

        enter(PageState::Scrolling, attempt);
        let steps = scroll_to_bottom(
            driver,
            self.config.scroll_steps,
            Duration::from_millis(self.config.scroll_settle_ms),
        )
        .await;
        debug!(steps, "Scrolling finished");

        enter(PageState::PopupCheck, attempt);
        dismiss_popup(driver, ui_timeout).await;

        enter(PageState::Extracting, attempt);
        let extraction = extract_page(driver).await?;
        Ok(extraction.into_record(url, attempt.saturating_sub(1)))
    }

    /// Navigate and confirm the page rendered something plausible.
    async fn load<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        url: &str,
        nav_timeout: Duration,
        load_timeout: Duration,
    ) -> Result<(), AttemptError> {
        let response = driver
            .navigate(url, WaitStrategy::DomContentLoaded, nav_timeout)
            .await
            .map_err(|e| AttemptError::NavigationFailed(e.to_string()))?
            .ok_or_else(|| AttemptError::NavigationFailed(format!("no response for {url}")))?;

        if let Some(status) = response.status
            && status >= 400
        {
            return Err(AttemptError::NavigationFailed(format!(
                "HTTP {status} from {}",
                response.url
            )));
        }
        info!(status = ?response.status, final_url = %response.url, "Navigation response");

        wait_until_complete(driver, load_timeout).await;

        let html_length = driver.full_markup().await?.len();
        if html_length < self.config.min_html_length {
            return Err(AttemptError::NavigationFailed(format!(
                "content too short ({html_length} < {} bytes)",
                self.config.min_html_length
            )));
        }
        debug!(html_length, "Page content loaded");
        Ok(())
    }
}

/// Poll `document.readyState` until `complete`. Running out of time is
/// logged and tolerated.
async fn wait_until_complete<D: PageDriver + ?Sized>(driver: &D, timeout: Duration) {
    let poll = async {
        let mut interval = Duration::from_millis(50);
        loop {
            match driver.evaluate(READY_STATE_JS).await {
                Ok(state) if state.as_str() == Some("complete") => return,
                Ok(_) => {}
                Err(e) => {
                    debug!("readyState read failed: {}", e);
                    return;
                }
            }
            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(Duration::from_millis(500));
        }
    };
    if tokio::time::timeout(timeout, poll).await.is_err() {
        warn!(
            timeout_ms = timeout.as_millis() as u64,
            "Page did not finish loading; continuing with what rendered"
        );
    }
}
