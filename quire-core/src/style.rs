//! Style and layout resolution.
//!
//! Turns the raw [`StyleSheet`] and [`LayoutConfig`] records into a typed
//! [`StyleTable`] and a [`LayoutRecord`] whose dimensions are all in inches.
//! This layer is strict: anything that cannot be coerced is a
//! [`ConfigError`].

use crate::config::{ConfigError, LayoutConfig, StyleConfig, StyleSheet};
use serde::{Serialize, Serializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of the style used when a span or block names none
pub const DEFAULT_STYLE: &str = "normal";

/// Horizontal paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" => Ok(Alignment::Justify),
            _ => Err(()),
        }
    }
}

/// 24-bit RGB color, written as six hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ();

    /// Accepts `RRGGBB` with or without a leading `#`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ());
        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fully resolved, named style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    pub font_name: String,
    /// Points
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Color>,
    pub alignment: Alignment,
    /// Points
    pub space_before: f64,
    /// Points
    pub space_after: f64,
}

impl StyleDefinition {
    /// The built-in defaults, under the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            font_name: "Arial".to_string(),
            font_size: 11.0,
            bold: false,
            italic: false,
            underline: false,
            color: None,
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    fn resolve(name: &str, config: &StyleConfig) -> Result<Self, ConfigError> {
        for key in config.unknown.keys() {
            tracing::warn!("Ignoring unknown key `{}` in style '{}'", key, name);
        }

        let field = |key: &str| format!("styles.{}.{}", name, key);
        let mut style = StyleDefinition::named(name);

        if let Some(value) = &config.font_name {
            style.font_name = coerce_text(&field("font_name"), value)?;
        }
        if let Some(value) = &config.font_size {
            style.font_size = coerce_non_negative(&field("font_size"), value)?;
        }
        if let Some(value) = &config.bold {
            style.bold = coerce_flag(&field("bold"), value)?;
        }
        if let Some(value) = &config.italic {
            style.italic = coerce_flag(&field("italic"), value)?;
        }
        if let Some(value) = &config.underline {
            style.underline = coerce_flag(&field("underline"), value)?;
        }
        if let Some(value) = &config.color {
            style.color = coerce_color(&field("color"), value)?;
        }
        if let Some(value) = &config.alignment {
            let text = coerce_text(&field("alignment"), value)?;
            style.alignment = text
                .parse()
                .map_err(|_| ConfigError::InvalidAlignment {
                    field: field("alignment"),
                    value: text.clone(),
                })?;
        }
        if let Some(value) = &config.space_before {
            style.space_before = coerce_non_negative(&field("space_before"), value)?;
        }
        if let Some(value) = &config.space_after {
            style.space_after = coerce_non_negative(&field("space_after"), value)?;
        }

        Ok(style)
    }
}

/// Resolved styles keyed by name. Always contains [`DEFAULT_STYLE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleTable {
    styles: BTreeMap<String, StyleDefinition>,
}

impl StyleTable {
    /// Validate and coerce every style in the sheet
    pub fn resolve(sheet: &StyleSheet) -> Result<Self, ConfigError> {
        let mut styles = BTreeMap::new();
        for (name, config) in &sheet.styles {
            let config = config.clone().unwrap_or_default();
            styles.insert(name.clone(), StyleDefinition::resolve(name, &config)?);
        }
        if !styles.contains_key(DEFAULT_STYLE) {
            tracing::debug!("No '{}' style declared, using built-in defaults", DEFAULT_STYLE);
            styles.insert(
                DEFAULT_STYLE.to_string(),
                StyleDefinition::named(DEFAULT_STYLE),
            );
        }
        Ok(Self { styles })
    }

    /// Build a table from already-resolved definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = StyleDefinition>) -> Self {
        let mut styles: BTreeMap<String, StyleDefinition> = definitions
            .into_iter()
            .map(|style| (style.name.clone(), style))
            .collect();
        styles
            .entry(DEFAULT_STYLE.to_string())
            .or_insert_with(|| StyleDefinition::named(DEFAULT_STYLE));
        Self { styles }
    }

    pub fn get(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Look up a style that something explicitly references
    pub fn require(&self, name: &str, referenced_by: &str) -> Result<&StyleDefinition, ConfigError> {
        self.styles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownStyle {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    pub fn default_style(&self) -> &StyleDefinition {
        // Both constructors insert the default style.
        &self.styles[DEFAULT_STYLE]
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::from_definitions([])
    }
}

/// Length units accepted in layout files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Inches,
    Mm,
    Cm,
}

impl Unit {
    /// How many inches one of this unit is
    pub fn inches_per_unit(&self) -> f64 {
        match self {
            Unit::Inches => 1.0,
            Unit::Mm => 1.0 / 25.4,
            Unit::Cm => 1.0 / 2.54,
        }
    }

    pub fn to_inches(&self, value: f64) -> f64 {
        value * self.inches_per_unit()
    }

    pub fn from_inches(&self, inches: f64) -> f64 {
        inches / self.inches_per_unit()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Inches => "inches",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
        }
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inches" => Ok(Unit::Inches),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            other => Err(ConfigError::InvalidUnit(other.to_string())),
        }
    }
}

/// Header or footer template before field expansion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FurnitureTemplate {
    pub text: String,
    pub style: String,
}

/// Page geometry in inches plus header/footer templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRecord {
    /// Unit the layout was declared in; every length below is already inches
    pub declared_unit: Unit,
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub header: Option<FurnitureTemplate>,
    pub footer: Option<FurnitureTemplate>,
    /// Suppress header and footer on the first page
    pub different_first_page: bool,
}

impl Default for LayoutRecord {
    fn default() -> Self {
        Self {
            declared_unit: Unit::Inches,
            page_width: 8.5,
            page_height: 11.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.0,
            margin_right: 1.0,
            header: None,
            footer: None,
            different_first_page: true,
        }
    }
}

impl LayoutRecord {
    /// Validate the layout, convert lengths to inches, and check that the
    /// header/footer styles exist in `styles`.
    pub fn resolve(config: &LayoutConfig, styles: &StyleTable) -> Result<Self, ConfigError> {
        for key in config.unknown.keys() {
            tracing::warn!("Ignoring unknown layout key `{}`", key);
        }

        let unit = match &config.unit {
            Some(value) => coerce_text("layout.unit", value)?.parse::<Unit>()?,
            None => Unit::Inches,
        };

        let mut layout = LayoutRecord {
            declared_unit: unit,
            ..LayoutRecord::default()
        };

        let dimensions: [(&str, &Option<Value>, &mut f64); 6] = [
            ("page_width", &config.page_width, &mut layout.page_width),
            ("page_height", &config.page_height, &mut layout.page_height),
            ("margin_top", &config.margin_top, &mut layout.margin_top),
            ("margin_bottom", &config.margin_bottom, &mut layout.margin_bottom),
            ("margin_left", &config.margin_left, &mut layout.margin_left),
            ("margin_right", &config.margin_right, &mut layout.margin_right),
        ];
        for (key, value, slot) in dimensions {
            if let Some(value) = value {
                let raw = coerce_non_negative(&format!("layout.{}", key), value)?;
                *slot = unit.to_inches(raw);
            }
        }

        layout.header = furniture(
            config.header_text.as_deref(),
            config.header_style.as_deref(),
            "layout.header_style",
            styles,
        )?;
        layout.footer = furniture(
            config.footer_text.as_deref(),
            config.footer_style.as_deref(),
            "layout.footer_style",
            styles,
        )?;

        if let Some(value) = &config.different_first_page {
            layout.different_first_page = coerce_flag("layout.different_first_page", value)?;
        }

        tracing::debug!(
            "Resolved {} layout: {:.3}in x {:.3}in",
            unit.as_str(),
            layout.page_width,
            layout.page_height
        );

        Ok(layout)
    }
}

fn furniture(
    text: Option<&str>,
    style: Option<&str>,
    field: &str,
    styles: &StyleTable,
) -> Result<Option<FurnitureTemplate>, ConfigError> {
    let style = style.unwrap_or(DEFAULT_STYLE);
    styles.require(style, field)?;

    Ok(text
        .filter(|t| !t.is_empty())
        .map(|t| FurnitureTemplate {
            text: t.to_string(),
            style: style.to_string(),
        }))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

fn coerce_number(field: &str, value: &Value) -> Result<f64, ConfigError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConfigError::NotNumeric {
            field: field.to_string(),
            found: describe(value),
        })
}

fn coerce_non_negative(field: &str, value: &Value) -> Result<f64, ConfigError> {
    let number = coerce_number(field, value)?;
    if number < 0.0 {
        return Err(ConfigError::NegativeValue {
            field: field.to_string(),
            value: number,
        });
    }
    Ok(number)
}

fn coerce_flag(field: &str, value: &Value) -> Result<bool, ConfigError> {
    let flag = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" => Some(true),
            "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.ok_or_else(|| ConfigError::NotBoolean {
        field: field.to_string(),
        found: describe(value),
    })
}

fn coerce_text(field: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ConfigError::NotText {
            field: field.to_string(),
            found: describe(other),
        }),
    }
}

fn coerce_color(field: &str, value: &Value) -> Result<Option<Color>, ConfigError> {
    if value.is_null() {
        return Ok(None);
    }
    let text = coerce_text(field, value)?;
    text.parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidColor {
            field: field.to_string(),
            value: text.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(yaml: &str) -> StyleSheet {
        StyleSheet::from_yaml_str(yaml).unwrap()
    }

    fn layout(yaml: &str) -> LayoutConfig {
        LayoutConfig::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_resolve_style_with_coercion() {
        let table = StyleTable::resolve(&sheet(
            r##"
styles:
  title:
    font_name: Garamond
    font_size: "18"
    bold: yes
    italic: "false"
    color: "#0563c1"
    alignment: Center
    space_after: 12
"##,
        ))
        .unwrap();

        let title = table.get("title").unwrap();
        assert_eq!(title.font_name, "Garamond");
        assert_eq!(title.font_size, 18.0);
        assert!(title.bold);
        assert!(!title.italic);
        assert_eq!(title.color, Some(Color::new(0x05, 0x63, 0xC1)));
        assert_eq!(title.alignment, Alignment::Center);
        assert_eq!(title.space_after, 12.0);
        assert_eq!(title.space_before, 0.0);
    }

    #[test]
    fn test_normal_style_is_always_present() {
        let table = StyleTable::resolve(&sheet("styles: {}\n")).unwrap();
        assert_eq!(table.default_style(), &StyleDefinition::named("normal"));

        let table = StyleTable::resolve(&sheet("styles:\n  normal:\n    font_size: 10\n")).unwrap();
        assert_eq!(table.default_style().font_size, 10.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_style_values() {
        let err = StyleTable::resolve(&sheet("styles:\n  a:\n    color: red\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { .. }));

        let err = StyleTable::resolve(&sheet("styles:\n  a:\n    font_size: big\n")).unwrap_err();
        assert!(matches!(err, ConfigError::NotNumeric { .. }));

        let err = StyleTable::resolve(&sheet("styles:\n  a:\n    bold: maybe\n")).unwrap_err();
        assert!(matches!(err, ConfigError::NotBoolean { .. }));

        let err = StyleTable::resolve(&sheet("styles:\n  a:\n    alignment: middle\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAlignment { .. }));

        let err = StyleTable::resolve(&sheet("styles:\n  a:\n    space_before: -2\n")).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeValue { .. }));
    }

    #[test]
    fn test_unknown_style_keys_are_ignored() {
        let table = StyleTable::resolve(&sheet("styles:\n  a:\n    kerning: 3\n")).unwrap();
        assert_eq!(table.get("a").unwrap().font_name, "Arial");
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("FF0000".parse::<Color>(), Ok(Color::new(255, 0, 0)));
        assert_eq!("#00ff7f".parse::<Color>(), Ok(Color::new(0, 255, 127)));
        assert!("#FFF".parse::<Color>().is_err());
        assert!("GG0000".parse::<Color>().is_err());
        assert_eq!(Color::new(5, 99, 193).to_string(), "0563C1");
    }

    #[test]
    fn test_layout_defaults_to_inches() {
        let table = StyleTable::default();
        let record = LayoutRecord::resolve(&layout("layout:\n  page_width: 6\n"), &table).unwrap();
        assert_eq!(record.declared_unit, Unit::Inches);
        assert_eq!(record.page_width, 6.0);
        assert_eq!(record.page_height, 11.0);
        assert_eq!(record.margin_left, 1.0);
        assert!(record.header.is_none());
        assert!(record.different_first_page);
    }

    #[test]
    fn test_layout_converts_mm_and_cm() {
        let table = StyleTable::default();

        let record = LayoutRecord::resolve(
            &layout("layout:\n  unit: mm\n  page_width: 152.4\n  margin_top: 25.4\n"),
            &table,
        )
        .unwrap();
        assert!((record.page_width - 6.0).abs() < 1e-9);
        assert!((record.margin_top - 1.0).abs() < 1e-9);

        let record = LayoutRecord::resolve(
            &layout("layout:\n  unit: CM\n  page_height: 22.86\n"),
            &table,
        )
        .unwrap();
        assert_eq!(record.declared_unit, Unit::Cm);
        assert!((record.page_height - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_round_trip() {
        for unit in [Unit::Inches, Unit::Mm, Unit::Cm] {
            for value in [0.0, 0.5, 1.0, 8.5, 11.0, 297.0] {
                let inches = unit.to_inches(value);
                assert!((unit.from_inches(inches) - value).abs() < 1e-9);

                let through_other = Unit::Mm.to_inches(Unit::Mm.from_inches(inches));
                assert!((through_other - inches).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_layout_errors() {
        let table = StyleTable::default();

        let err = LayoutRecord::resolve(&layout("layout:\n  unit: furlongs\n"), &table).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUnit(ref u) if u == "furlongs"));

        let err = LayoutRecord::resolve(&layout("layout:\n  margin_left: -1\n"), &table).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeValue { ref field, .. } if field == "layout.margin_left"));

        let err = LayoutRecord::resolve(&layout("layout:\n  page_width: wide\n"), &table).unwrap_err();
        assert!(matches!(err, ConfigError::NotNumeric { .. }));
    }

    #[test]
    fn test_header_and_footer_styles_must_exist() {
        let table = StyleTable::resolve(&sheet("styles:\n  running: {}\n")).unwrap();

        let record = LayoutRecord::resolve(
            &layout("layout:\n  header_text: My Book\n  header_style: running\n  footer_text: \"{page}\"\n"),
            &table,
        )
        .unwrap();
        assert_eq!(record.header.as_ref().unwrap().style, "running");
        assert_eq!(record.footer.as_ref().unwrap().style, "normal");

        let err = LayoutRecord::resolve(
            &layout("layout:\n  footer_text: x\n  footer_style: missing\n"),
            &table,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownStyle { ref name, ref referenced_by }
                if name == "missing" && referenced_by == "layout.footer_style"
        ));
    }
}
