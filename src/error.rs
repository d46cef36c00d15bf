use thiserror::Error;

use crate::browser::BrowserError;
use crate::record::{AttemptOutcome, ProfileRecord, RetryAttempt};

/// Errors that end a run
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Rejected before any browser work
    #[error("Invalid profile URL '{url}': {reason}")]
    InvalidInputUrl { url: String, reason: String },

    #[error("Gave up after {} attempt(s); last outcome: {:?}", .attempts.len(), last_outcome(.attempts))]
    ExhaustedRetries { attempts: Vec<RetryAttempt> },

    /// The scrape succeeded but the output file could not be read or written.
    /// The scraped record travels with the error.
    #[error("Failed to persist record to {path}: {reason}")]
    Persistence {
        path: String,
        reason: String,
        record: Box<ProfileRecord>,
    },
}

fn last_outcome(attempts: &[RetryAttempt]) -> Option<AttemptOutcome> {
    attempts.last().map(|a| a.outcome)
}

impl ScrapeError {
    /// Distinct process exit status per fatal condition
    pub fn exit_code(&self) -> u8 {
        match self {
            ScrapeError::InvalidInputUrl { .. } => 2,
            ScrapeError::ExhaustedRetries { .. } => 3,
            ScrapeError::Persistence { .. } => 4,
        }
    }

    /// The record a run produced before failing, if it got that far
    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            ScrapeError::Persistence { record, .. } => Some(record.as_ref()),
            _ => None,
        }
    }
}

/// Errors that end a single attempt; all of them route into the retry path
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Auth wall detected ({})", .signals.join(", "))]
    AuthWallDetected { signals: Vec<&'static str> },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl AttemptError {
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            AttemptError::NavigationFailed(_) => AttemptOutcome::NavigationFailed,
            AttemptError::AuthWallDetected { .. } => AttemptOutcome::AuthWallDetected,
            AttemptError::Browser(BrowserError::NavigationFailed(_)) => {
                AttemptOutcome::NavigationFailed
            }
            AttemptError::Browser(_) => AttemptOutcome::Error,
        }
    }
}
