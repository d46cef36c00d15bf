//! Extracted page metadata types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::text::non_empty;

/// Declarative key/value metadata: document title, meta description and
/// OpenGraph (social preview) tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_url: Option<String>,
    pub og_type: Option<String>,
}

/// Embedded JSON-LD blocks whose subject is a person or a profile page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredData {
    pub subjects: Vec<Value>,
}

impl StructuredData {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// The Person the page describes: a top-level Person node, else the
    /// `mainEntity` of a ProfilePage.
    pub fn person(&self) -> Option<&Value> {
        self.subjects
            .iter()
            .find(|node| has_type(node, "Person"))
            .or_else(|| {
                self.subjects
                    .iter()
                    .filter(|node| has_type(node, "ProfilePage"))
                    .find_map(|page| page.get("mainEntity").filter(|e| e.is_object()))
            })
    }

    pub fn name(&self) -> Option<String> {
        self.person_field("name")
    }

    pub fn job_title(&self) -> Option<String> {
        self.person_field("jobTitle")
    }

    pub fn description(&self) -> Option<String> {
        self.person_field("description")
    }

    /// `address.addressLocality`, joined with the region/country when present
    pub fn locality(&self) -> Option<String> {
        let address = self.person()?.get("address")?;
        let address = match address {
            Value::Array(items) => items.first()?,
            other => other,
        };
        if let Value::String(s) = address {
            return non_empty(s);
        }

        let parts: Vec<String> = ["addressLocality", "addressRegion", "addressCountry"]
            .iter()
            .filter_map(|key| address.get(*key).and_then(first_text))
            .collect();
        non_empty(&parts.join(", "))
    }

    pub fn works_for(&self) -> Option<String> {
        self.person_field("worksFor")
    }

    pub fn alumni_of(&self) -> Option<String> {
        self.person_field("alumniOf")
    }

    fn person_field(&self, key: &str) -> Option<String> {
        self.person()?.get(key).and_then(first_text)
    }
}

/// `@type` equals `wanted`, either directly or as one entry of an array.
pub fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

/// First usable text in a JSON-LD value: a string, the first element of an
/// array, or an object's `name`.
pub fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Object(map) => map.get("name").and_then(first_text),
        _ => None,
    }
}
