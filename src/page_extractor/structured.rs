//! Tolerant scanning of raw markup for JSON-LD blocks and meta tags
//!
//! Pattern-based, not a conforming HTML parser. A bad block is skipped
//! without affecting the rest.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use super::schema::{PageMetadata, StructuredData, has_type};
use crate::utils::text::{decode_entities, non_empty};

static LD_JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script\b[^>]*?\btype\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script\s*>"#,
    )
    .expect("ld+json regex")
});

static META_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("meta tag regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("attribute regex")
});

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("title regex"));

/// Subject types kept from JSON-LD blocks
const SUBJECT_TYPES: &[&str] = &["Person", "ProfilePage"];

/// Parse every JSON-LD block in `markup`, keeping person/profile-page nodes.
///
/// Blocks that are not valid JSON are skipped; scanning continues with the
/// next block. Top-level arrays and `@graph` arrays are flattened first.
pub fn extract_structured_data(markup: &str) -> StructuredData {
    let mut subjects = Vec::new();

    for (index, captures) in LD_JSON_BLOCK.captures_iter(markup).enumerate() {
        let body = captures.get(1).map_or("", |m| m.as_str()).trim();
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(block = index, "Skipping malformed structured data block: {}", e);
                continue;
            }
        };

        let mut nodes = Vec::new();
        flatten_nodes(parsed, &mut nodes);
        subjects.extend(
            nodes
                .into_iter()
                .filter(|node| SUBJECT_TYPES.iter().any(|t| has_type(node, t))),
        );
    }

    debug!("Structured data: {} subject node(s)", subjects.len());
    StructuredData { subjects }
}

fn flatten_nodes(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_nodes(item, out)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_nodes(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

/// Title, description and OpenGraph tags. The first occurrence of each key
/// wins; attribute order inside a tag does not matter.
pub fn extract_page_metadata(markup: &str) -> PageMetadata {
    let mut meta = PageMetadata {
        title: TITLE_TAG
            .captures(markup)
            .and_then(|c| c.get(1))
            .and_then(|m| non_empty(&decode_entities(m.as_str()))),
        ..PageMetadata::default()
    };

    for tag in META_TAG.captures_iter(markup) {
        let attrs = tag.get(1).map_or("", |m| m.as_str());
        let mut key = None;
        let mut content = None;

        for attr in ATTRIBUTE.captures_iter(attrs) {
            let name = attr[1].to_ascii_lowercase();
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map_or("", |m| m.as_str());
            match name.as_str() {
                "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                "content" => content = non_empty(&decode_entities(value)),
                _ => {}
            }
        }

        let (Some(key), Some(content)) = (key, content) else {
            continue;
        };
        let slot = match key.as_str() {
            "description" => &mut meta.description,
            "og:title" => &mut meta.og_title,
            "og:description" => &mut meta.og_description,
            "og:image" => &mut meta.og_image,
            "og:url" => &mut meta.og_url,
            "og:type" => &mut meta.og_type,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(content);
        }
    }

    meta
}
