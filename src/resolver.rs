//! Per-field precedence resolution
//!
//! Every scalar field has an ordered chain of sources. Candidates are
//! ranked by their source's position in that chain and the first non-empty
//! value wins; a lower-ranked source never overwrites a resolved field.

use tracing::debug;

use crate::page_extractor::{DomSnapshot, PageMetadata, StructuredData};
use crate::utils::constants::SITE_TITLE_SUFFIX;
use crate::utils::text::non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Headline,
    Location,
    About,
    CurrentCompany,
    EducationTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// JSON-LD Person node
    StructuredData,
    /// OpenGraph title/description
    SocialPreview,
    /// Rendered top-card elements
    Dom,
    /// `<meta name="description">`
    MetaDescription,
    /// Segments of the document title
    PageTitle,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Headline,
        Field::Location,
        Field::About,
        Field::CurrentCompany,
        Field::EducationTop,
    ];

    /// Sources for this field, highest priority first
    pub fn chain(self) -> &'static [Source] {
        const LD: Source = Source::StructuredData;
        const OG: Source = Source::SocialPreview;
        match self {
            Field::Name => &[LD, OG, Source::Dom, Source::PageTitle],
            Field::Headline => &[LD, Source::Dom, OG, Source::PageTitle],
            Field::Location => &[LD, Source::Dom],
            Field::About => &[LD, Source::Dom, OG, Source::MetaDescription],
            Field::CurrentCompany => &[LD, Source::Dom],
            Field::EducationTop => &[LD, Source::Dom],
        }
    }
}

/// A value one source offers for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: Field,
    pub source: Source,
    pub value: String,
    /// Position of `source` in the field's chain; lower wins
    pub rank: usize,
}

impl Candidate {
    /// `None` when `source` is not part of `field`'s chain.
    pub fn new(field: Field, source: Source, value: impl Into<String>) -> Option<Candidate> {
        let rank = field.chain().iter().position(|s| *s == source)?;
        Some(Candidate {
            field,
            source,
            value: value.into(),
            rank,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub current_company: Option<String>,
    pub education_top: Option<String>,
}

impl ResolvedFields {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Name => &self.name,
            Field::Headline => &self.headline,
            Field::Location => &self.location,
            Field::About => &self.about,
            Field::CurrentCompany => &self.current_company,
            Field::EducationTop => &self.education_top,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Headline => &mut self.headline,
            Field::Location => &mut self.location,
            Field::About => &mut self.about,
            Field::CurrentCompany => &mut self.current_company,
            Field::EducationTop => &mut self.education_top,
        }
    }
}

/// Reduce candidates to one value per field.
///
/// Resolved values are whitespace-normalized and never empty.
pub fn resolve(mut candidates: Vec<Candidate>) -> ResolvedFields {
    candidates.sort_by_key(|c| c.rank);

    let mut resolved = ResolvedFields::default();
    for candidate in candidates {
        let slot = resolved.slot_mut(candidate.field);
        if slot.is_some() {
            continue;
        }
        if let Some(value) = non_empty(&candidate.value) {
            debug!(field = ?candidate.field, source = ?candidate.source, "Field resolved");
            *slot = Some(value);
        }
    }

    for field in Field::ALL {
        if resolved.get(field).is_none() {
            debug!(field = ?field, "No source produced a value; field left absent");
        }
    }
    resolved
}

/// Split a profile title like `"Name - Headline | LinkedIn"` into its name
/// and headline segments.
pub fn split_profile_title(title: &str) -> (Option<String>, Option<String>) {
    let without_site = match title.rsplit_once('|') {
        Some((head, tail)) if tail.trim().eq_ignore_ascii_case(SITE_TITLE_SUFFIX) => head,
        _ => title,
    };

    let mut parts = without_site.splitn(2, " - ");
    let name = parts.next().and_then(non_empty);
    let headline = parts.next().and_then(non_empty);
    (name, headline)
}

/// Turn every source's raw values into ranked candidates.
pub fn gather_candidates(
    structured: &StructuredData,
    metadata: &PageMetadata,
    dom: &DomSnapshot,
    document_title: &str,
) -> Vec<Candidate> {
    let mut offered: Vec<(Field, Source, Option<String>)> = vec![
        (Field::Name, Source::StructuredData, structured.name()),
        (Field::Headline, Source::StructuredData, structured.job_title()),
        (Field::Location, Source::StructuredData, structured.locality()),
        (Field::About, Source::StructuredData, structured.description()),
        (Field::CurrentCompany, Source::StructuredData, structured.works_for()),
        (Field::EducationTop, Source::StructuredData, structured.alumni_of()),
        (Field::Name, Source::Dom, dom.heading.clone()),
        (Field::Headline, Source::Dom, dom.headline.clone()),
        (Field::Location, Source::Dom, dom.location.clone()),
        (Field::About, Source::Dom, dom.about.clone()),
        (Field::CurrentCompany, Source::Dom, dom.current_company.clone()),
        (Field::EducationTop, Source::Dom, dom.education_top.clone()),
        (Field::About, Source::SocialPreview, metadata.og_description.clone()),
        (Field::About, Source::MetaDescription, metadata.description.clone()),
    ];

    if let Some(og_title) = &metadata.og_title {
        let (name, headline) = split_profile_title(og_title);
        offered.push((Field::Name, Source::SocialPreview, name));
        offered.push((Field::Headline, Source::SocialPreview, headline));
    }

    let (title_name, title_headline) = split_profile_title(document_title);
    offered.push((Field::Name, Source::PageTitle, title_name));
    offered.push((Field::Headline, Source::PageTitle, title_headline));

    offered
        .into_iter()
        .filter_map(|(field, source, value)| Candidate::new(field, source, value?))
        .collect()
}
