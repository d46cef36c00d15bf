//! Page content extraction
//!
//! Markup scanning (JSON-LD, meta tags) works on the serialized document;
//! the top card and labeled sections are read from the live DOM.

pub mod dom;
pub mod js_scripts;
pub mod page_info;
pub mod schema;
pub mod sections;
pub mod structured;

pub use dom::{DomSnapshot, followers_and_connections, read_dom_snapshot};
pub use page_info::{PageExtraction, ProfileSections, extract_page};
pub use schema::{PageMetadata, StructuredData};
pub use sections::{
    clean_section_items, parse_experience_line, parse_one_line_experience, section_by_heading,
};
pub use structured::{extract_page_metadata, extract_structured_data};
