//! Automation-engine contract
//!
//! The controller and extractors only talk to a page through [`PageDriver`],
//! and only obtain pages through a [`SessionFactory`]. The chromiumoxide
//! implementation lives in [`crate::session`]; tests script their own.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::browser::BrowserResult;

/// When navigation is considered complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// `document.readyState` has left `loading`
    DomContentLoaded,
    /// Full page lifecycle, including subresources
    Load,
}

/// Main-document response observed during navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub status: Option<u16>,
    pub url: String,
}

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait according to `wait`, bounded by `timeout`.
    ///
    /// `Ok(None)` means the navigation produced no main-document response.
    async fn navigate(
        &self,
        url: &str,
        wait: WaitStrategy,
        timeout: Duration,
    ) -> BrowserResult<Option<NavigationResponse>>;

    /// Evaluate an expression in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> BrowserResult<Value>;

    /// Call a function declaration with JSON arguments. Arguments are passed
    /// out-of-band, never spliced into the script text.
    async fn evaluate_function(&self, declaration: &str, args: Vec<Value>) -> BrowserResult<Value>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str, timeout: Duration) -> BrowserResult<usize>;

    /// Whether the first element matching `selector` is rendered and visible
    async fn is_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<bool>;

    async fn click(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Send a key press (e.g. `"Escape"`) to the focused document
    async fn press_key(&self, key: &str) -> BrowserResult<()>;

    async fn current_url(&self) -> BrowserResult<String>;

    async fn title(&self) -> BrowserResult<String>;

    /// Serialized DOM of the whole document as currently rendered
    async fn full_markup(&self) -> BrowserResult<String>;
}

/// A page plus whatever owns it, scoped to one scrape attempt
#[async_trait]
pub trait PageSession: PageDriver {
    /// Release every resource behind the session. Called exactly once, on
    /// every exit path of the attempt that opened it.
    async fn close(self);
}

/// Allocates a fresh, isolated session for each attempt
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: PageSession;

    async fn open(&self) -> BrowserResult<Self::Session>;
}
