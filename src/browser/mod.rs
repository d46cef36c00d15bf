//! Browser infrastructure for launching and tearing down Chrome instances
//!
//! One browser process per scrape attempt, torn down when the attempt ends.

mod wrapper;

pub use crate::browser_setup::launch_browser;
pub use wrapper::{BrowserWrapper, create_blank_page};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Element interaction failed: {0}")]
    Interaction(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Evaluation(err.to_string())
    }
}

impl From<std::io::Error> for BrowserError {
    fn from(err: std::io::Error) -> Self {
        BrowserError::IoError(err.to_string())
    }
}

pub type BrowserResult<T> = Result<T, BrowserError>;
