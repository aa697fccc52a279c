//! Configuration records and loading.
//!
//! The records here mirror the YAML files one to one and keep scalar fields
//! as raw [`serde_yaml::Value`]s; [`crate::style`] owns validation and
//! coercion into the typed style table and layout record.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Style '{name}' referenced by {referenced_by} is not defined")]
    UnknownStyle { name: String, referenced_by: String },

    #[error("Invalid unit '{0}'. Must be 'inches', 'mm', or 'cm'.")]
    InvalidUnit(String),

    #[error("Field `{field}` must not be negative, got {value}")]
    NegativeValue { field: String, value: f64 },

    #[error("Field `{field}` expects a number, got {found}")]
    NotNumeric { field: String, found: String },

    #[error("Field `{field}` expects true or false, got {found}")]
    NotBoolean { field: String, found: String },

    #[error("Field `{field}` expects text, got {found}")]
    NotText { field: String, found: String },

    #[error("Invalid color '{value}' for `{field}`. Expected 6 hex characters.")]
    InvalidColor { field: String, value: String },

    #[error("Invalid alignment '{value}' for `{field}`. Must be 'left', 'center', 'right', or 'justify'.")]
    InvalidAlignment { field: String, value: String },
}

/// Style file contents (`styles:` top-level key)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    #[serde(default)]
    pub styles: BTreeMap<String, Option<StyleConfig>>,
}

/// One named style as written in YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default, alias = "font")]
    pub font_name: Option<Value>,

    #[serde(default, alias = "size")]
    pub font_size: Option<Value>,

    #[serde(default)]
    pub bold: Option<Value>,

    #[serde(default)]
    pub italic: Option<Value>,

    #[serde(default)]
    pub underline: Option<Value>,

    #[serde(default)]
    pub color: Option<Value>,

    #[serde(default)]
    pub alignment: Option<Value>,

    #[serde(default)]
    pub space_before: Option<Value>,

    #[serde(default)]
    pub space_after: Option<Value>,

    /// Keys quire does not recognize; warned about and ignored
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

/// Layout file contents (`layout:` top-level key)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
}

/// Page geometry and furniture as written in YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub unit: Option<Value>,

    #[serde(default)]
    pub page_width: Option<Value>,

    #[serde(default)]
    pub page_height: Option<Value>,

    #[serde(default)]
    pub margin_top: Option<Value>,

    #[serde(default)]
    pub margin_bottom: Option<Value>,

    #[serde(default)]
    pub margin_left: Option<Value>,

    #[serde(default)]
    pub margin_right: Option<Value>,

    #[serde(default)]
    pub header_text: Option<String>,

    #[serde(default)]
    pub header_style: Option<String>,

    #[serde(default)]
    pub footer_text: Option<String>,

    #[serde(default)]
    pub footer_style: Option<String>,

    #[serde(default)]
    pub different_first_page: Option<Value>,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl StyleSheet {
    /// Load a style sheet from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a style sheet from YAML text; an empty document is an empty sheet
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let sheet: Option<StyleSheet> = serde_yaml::from_str(contents)?;
        Ok(sheet.unwrap_or_default())
    }
}

impl LayoutConfig {
    /// Load the `layout:` record from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse the `layout:` record from YAML text; missing means all defaults
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: Option<LayoutFile> = serde_yaml::from_str(contents)?;
        Ok(file.and_then(|f| f.layout).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_style_sheet() {
        let yaml = r##"
styles:
  normal:
    font_name: Georgia
    font_size: 12
  quote:
    italic: true
    color: "#336699"
  empty:
"##;
        let sheet = StyleSheet::from_yaml_str(yaml).unwrap();
        assert_eq!(sheet.styles.len(), 3);

        let normal = sheet.styles["normal"].as_ref().unwrap();
        assert_eq!(normal.font_name, Some(Value::from("Georgia")));
        assert_eq!(normal.font_size, Some(Value::from(12)));
        assert!(sheet.styles["empty"].is_none());
    }

    #[test]
    fn test_style_aliases_and_unknown_keys() {
        let yaml = r#"
styles:
  title:
    font: Garamond
    size: 24
    kerning: tight
"#;
        let sheet = StyleSheet::from_yaml_str(yaml).unwrap();
        let title = sheet.styles["title"].as_ref().unwrap();
        assert_eq!(title.font_name, Some(Value::from("Garamond")));
        assert_eq!(title.font_size, Some(Value::from(24)));
        assert_eq!(title.unknown.get("kerning"), Some(&Value::from("tight")));
    }

    #[test]
    fn test_parse_layout() {
        let yaml = r#"
layout:
  unit: mm
  page_width: 152.4
  page_height: 228.6
  footer_text: "Page {page} of {total}"
"#;
        let layout = LayoutConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(layout.unit, Some(Value::from("mm")));
        assert_eq!(layout.footer_text.as_deref(), Some("Page {page} of {total}"));
        assert!(layout.header_text.is_none());
    }

    #[test]
    fn test_empty_documents_use_defaults() {
        assert!(StyleSheet::from_yaml_str("").unwrap().styles.is_empty());
        assert!(LayoutConfig::from_yaml_str("layout: {}\n")
            .unwrap()
            .page_width
            .is_none());
        assert!(LayoutConfig::from_yaml_str("  \n").unwrap().unit.is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = StyleSheet::from_yaml_str("styles: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "layout:\n  unit: cm\n  margin_top: 2").unwrap();

        let layout = LayoutConfig::from_file(file.path()).unwrap();
        assert_eq!(layout.unit, Some(Value::from("cm")));
        assert_eq!(layout.margin_top, Some(Value::from(2)));
    }

    #[test]
    fn test_missing_file() {
        let result = StyleSheet::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
