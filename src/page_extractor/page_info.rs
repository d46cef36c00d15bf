//! Everything read from a page once it is in a usable state
//!
//! Runs the markup scanners and the DOM reads in sequence and hands the
//! raw results to the resolver; nothing here decides between sources.

use chrono::Utc;
use tracing::{debug, info};

use super::dom::{DomSnapshot, followers_and_connections, read_dom_snapshot};
use super::schema::{PageMetadata, StructuredData};
use super::sections::{parse_one_line_experience, section_by_heading};
use super::structured::{extract_page_metadata, extract_structured_data};
use crate::browser::BrowserResult;
use crate::driver::PageDriver;
use crate::record::{ExperienceEntry, ProfileRecord};
use crate::resolver::{gather_candidates, resolve};
use crate::utils::constants::{
    SECTION_ACTIVITY, SECTION_CERTIFICATIONS, SECTION_EDUCATION, SECTION_EXPERIENCE,
    SECTION_HONORS, SECTION_LANGUAGES, SECTION_PROJECTS, SECTION_PUBLICATIONS, SECTION_SKILLS,
};

/// Labeled list sections of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSections {
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub activity: Vec<String>,
    pub certifications: Vec<String>,
    pub projects: Vec<String>,
    pub publications: Vec<String>,
    pub honors: Vec<String>,
    pub languages: Vec<String>,
}

/// Raw extraction results for one page
#[derive(Debug, Clone)]
pub struct PageExtraction {
    pub html_length: usize,
    pub structured: StructuredData,
    pub metadata: PageMetadata,
    pub document_title: String,
    pub dom: DomSnapshot,
    pub sections: ProfileSections,
}

/// Read markup, metadata, the top card and every labeled section.
///
/// Only the markup read itself can fail; the DOM and section reads degrade
/// to empty values.
pub async fn extract_page<D: PageDriver + ?Sized>(driver: &D) -> BrowserResult<PageExtraction> {
    let markup = driver.full_markup().await?;
    let structured = extract_structured_data(&markup);
    let metadata = extract_page_metadata(&markup);

    let document_title = match &metadata.title {
        Some(title) => title.clone(),
        None => driver.title().await.unwrap_or_default(),
    };

    let dom = read_dom_snapshot(driver).await;

    let sections = ProfileSections {
        experience: parse_one_line_experience(&section_by_heading(driver, SECTION_EXPERIENCE).await),
        education: section_by_heading(driver, SECTION_EDUCATION).await,
        skills: section_by_heading(driver, SECTION_SKILLS).await,
        activity: section_by_heading(driver, SECTION_ACTIVITY).await,
        certifications: section_by_heading(driver, SECTION_CERTIFICATIONS).await,
        projects: section_by_heading(driver, SECTION_PROJECTS).await,
        publications: section_by_heading(driver, SECTION_PUBLICATIONS).await,
        honors: section_by_heading(driver, SECTION_HONORS).await,
        languages: section_by_heading(driver, SECTION_LANGUAGES).await,
    };

    info!(
        html_length = markup.len(),
        structured_subjects = structured.subjects.len(),
        experience = sections.experience.len(),
        "Page extracted"
    );

    Ok(PageExtraction {
        html_length: markup.len(),
        structured,
        metadata,
        document_title,
        dom,
        sections,
    })
}

impl PageExtraction {
    /// Resolve scalar fields and assemble the immutable record.
    pub fn into_record(self, source_url: &str, retry_count: u32) -> ProfileRecord {
        let candidates = gather_candidates(
            &self.structured,
            &self.metadata,
            &self.dom,
            &self.document_title,
        );
        debug!("{} candidate value(s) gathered", candidates.len());
        let fields = resolve(candidates);
        let sections = self.sections;

        ProfileRecord {
            source_url: source_url.to_string(),
            scraped_at: Utc::now(),
            name: fields.name,
            headline: fields.headline,
            location: fields.location,
            about: fields.about,
            current_company: fields.current_company,
            education_top: fields.education_top,
            followers_and_connections: followers_and_connections(&self.dom.subline),
            experience: sections.experience,
            education: sections.education,
            skills: sections.skills,
            activity: sections.activity,
            certifications: sections.certifications,
            projects: sections.projects,
            publications: sections.publications,
            honors: sections.honors,
            languages: sections.languages,
            retry_count,
            html_length: self.html_length,
        }
    }
}
