//! Shared configuration constants for the scraper
//!
//! Fixed thresholds and labels used across the controller and extractors.

/// Chrome user agent string for stealth mode
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Section list items at or below this many characters are treated as
/// navigation noise ("Show all", "See more", dates on their own).
pub const MIN_SECTION_ITEM_CHARS: usize = 25;

/// Upper bound on follower/connection snippets kept in a record
pub const MAX_FOLLOWER_SNIPPETS: usize = 2;

/// Site suffix appended to titles of public profile pages
pub const SITE_TITLE_SUFFIX: &str = "LinkedIn";

/// Headings whose list items become record sections, in record order
pub const SECTION_EXPERIENCE: &str = "Experience";
pub const SECTION_EDUCATION: &str = "Education";
pub const SECTION_SKILLS: &str = "Skills";
pub const SECTION_ACTIVITY: &str = "Activity";
pub const SECTION_CERTIFICATIONS: &str = "Licenses & Certifications";
pub const SECTION_PROJECTS: &str = "Projects";
pub const SECTION_PUBLICATIONS: &str = "Publications";
pub const SECTION_HONORS: &str = "Honors & Awards";
pub const SECTION_LANGUAGES: &str = "Languages";
