//! Profile record model
//!
//! A [`ProfileRecord`] is built once per successful attempt and never
//! mutated afterwards; persistence appends it whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One line of the experience section, split heuristically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub duration: Option<String>,
    pub total_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_top: Option<String>,

    /// At most two snippets, e.g. "500+ connections"
    #[serde(default)]
    pub followers_and_connections: Vec<String>,

    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub activity: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub publications: Vec<String>,
    #[serde(default)]
    pub honors: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,

    /// Attempts that failed before the one that produced this record
    pub retry_count: u32,
    /// Length of the rendered markup the record was extracted from
    pub html_length: usize,
}

/// How a single attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Success,
    AuthWallDetected,
    NavigationFailed,
    Error,
}

/// Ledger entry for one attempt; discarded when the run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based
    pub attempt_index: u32,
    pub outcome: AttemptOutcome,
    /// Backoff slept before this attempt started
    pub elapsed_backoff: Duration,
}
