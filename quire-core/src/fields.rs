//! Live field descriptors: page numbers, table of contents, index entries.
//!
//! Fields are placeholders the output format fills in when it lays out pages,
//! so the model never carries a computed page number.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        let alternatives: Vec<String> = LiveField::ALL
            .iter()
            .map(|field| regex::escape(field.placeholder()))
            .collect();
        Regex::new(&alternatives.join("|")).unwrap()
    })
}

/// A value computed at layout time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveField {
    PageNumber,
    TotalPages,
}

impl LiveField {
    pub const ALL: [LiveField; 2] = [LiveField::PageNumber, LiveField::TotalPages];

    /// Placeholder text in header/footer templates
    pub fn placeholder(&self) -> &'static str {
        match self {
            LiveField::PageNumber => "{page}",
            LiveField::TotalPages => "{total}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldSegment {
    Text(String),
    Field(LiveField),
}

/// Split a header/footer template into literal text and live fields.
///
/// Empty literals are omitted.
///
/// ```
/// use quire_core::fields::{parse_template, FieldSegment, LiveField};
///
/// assert_eq!(
///     parse_template("{page}/{total}"),
///     vec![
///         FieldSegment::Field(LiveField::PageNumber),
///         FieldSegment::Text("/".to_string()),
///         FieldSegment::Field(LiveField::TotalPages),
///     ]
/// );
/// ```
pub fn parse_template(template: &str) -> Vec<FieldSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for found in placeholder_regex().find_iter(template) {
        let Some(field) = LiveField::ALL
            .into_iter()
            .find(|field| field.placeholder() == found.as_str())
        else {
            continue;
        };
        if found.start() > last {
            segments.push(FieldSegment::Text(template[last..found.start()].to_string()));
        }
        segments.push(FieldSegment::Field(field));
        last = found.end();
    }

    if last < template.len() {
        segments.push(FieldSegment::Text(template[last..].to_string()));
    }
    segments
}

/// Table of contents field, populated from the document's headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TocField {
    pub min_level: u8,
    pub max_level: u8,
    /// Entries link to their headings
    pub hyperlinks: bool,
}

impl Default for TocField {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            hyperlinks: true,
        }
    }
}

impl TocField {
    pub fn includes(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }
}

/// Hidden index marker for one term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexField {
    pub term: String,
}
