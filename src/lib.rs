//! Public profile scraping over a headless browser
//!
//! Loads one profile page in a fresh Chrome session per attempt, recovers
//! from popups and auth walls by retrying, reconciles structured data, meta
//! tags and the rendered DOM into a [`ProfileRecord`], and appends it to a
//! JSON output file.

mod browser;
pub mod browser_setup;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod output;
pub mod page_extractor;
pub mod record;
pub mod resolver;
pub mod session;
pub mod target;
mod utils;

use tracing::info;

pub use browser::{BrowserError, BrowserResult};
pub use config::{Config, OutputMode, WindowConfig};
pub use controller::{PageState, PageStateController};
pub use driver::{NavigationResponse, PageDriver, PageSession, SessionFactory, WaitStrategy};
pub use error::{AttemptError, ScrapeError};
pub use output::{JsonFileStore, OutputAccumulator, RecordStore, StoreError};
pub use record::{AttemptOutcome, ExperienceEntry, ProfileRecord, RetryAttempt};
pub use session::{ChromiumSession, ChromiumSessionFactory};
pub use target::validate_profile_url;
pub use utils::{constants, text};

/// Validate `raw_url`, scrape it, and persist the record.
///
/// Nothing touches the network or the output file when validation fails,
/// and the output file is only written after a successful attempt. A
/// persistence failure still hands the record back inside the error.
pub async fn run<F, S>(
    config: &Config,
    factory: &F,
    store: &S,
    raw_url: &str,
) -> Result<ProfileRecord, ScrapeError>
where
    F: SessionFactory,
    S: RecordStore + ?Sized,
{
    let url = validate_profile_url(raw_url)?;
    info!(url = %url, max_retries = config.max_retries, "Scraping profile");

    let record = PageStateController::new(config, factory)
        .run(url.as_str())
        .await?;

    let persisted = OutputAccumulator::from_config(store, config)
        .append(&record)
        .await;
    if let Err(e) = persisted {
        return Err(ScrapeError::Persistence {
            path: config.output_file.display().to_string(),
            reason: e.to_string(),
            record: Box::new(record),
        });
    }

    Ok(record)
}
