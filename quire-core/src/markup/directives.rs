//! Whole-line constructs: directive markers, headings and numbered list items.

use super::MarkerKind;
use regex::Regex;
use std::sync::OnceLock;

/// Deepest heading level recognized
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Deepest list nesting level recognized
pub const MAX_LIST_LEVEL: u8 = 9;

const TAB_WIDTH: usize = 4;

static SIMPLE_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static NAMED_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
static LIST_ITEM_REGEX: OnceLock<Regex> = OnceLock::new();

fn simple_marker_regex() -> &'static Regex {
    SIMPLE_MARKER_REGEX.get_or_init(|| Regex::new(r"(?i)^<<<(pagebreak|toc)>>>$").unwrap())
}

fn named_marker_regex() -> &'static Regex {
    NAMED_MARKER_REGEX.get_or_init(|| Regex::new(r"(?i)^<<<(index|bookmark):(.+)>>>$").unwrap())
}

fn heading_regex() -> &'static Regex {
    HEADING_REGEX.get_or_init(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").unwrap())
}

fn list_item_regex() -> &'static Regex {
    LIST_ITEM_REGEX.get_or_init(|| Regex::new(r"^([ \t]*)([0-9]{1,9})[.)][ \t]+(.+)$").unwrap())
}

/// Recognize a directive line such as `<<<toc>>>` or `<<<index:Rust>>>`.
///
/// `line` must already be trimmed. Keywords are case-insensitive; the
/// payload of `index`/`bookmark` is trimmed and must not be empty.
pub fn parse_marker(line: &str) -> Option<MarkerKind> {
    if let Some(captures) = simple_marker_regex().captures(line) {
        return match captures[1].to_lowercase().as_str() {
            "pagebreak" => Some(MarkerKind::PageBreak),
            _ => Some(MarkerKind::Toc),
        };
    }

    let captures = named_marker_regex().captures(line)?;
    let payload = captures[2].trim();
    if payload.is_empty() {
        return None;
    }
    match captures[1].to_lowercase().as_str() {
        "index" => Some(MarkerKind::IndexEntry(payload.to_string())),
        _ => Some(MarkerKind::Bookmark(payload.to_string())),
    }
}

/// Recognize `# Title` through `###### Title`, returning level and text
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let captures = heading_regex().captures(line)?;
    let level = captures.get(1)?.as_str().len() as u8;
    let text = captures.get(2)?.as_str().trim();
    if text.is_empty() {
        return None;
    }
    Some((level, text))
}

/// A numbered list line (`1. text`, `  2) text`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub level: u8,
    pub number: u32,
    pub text: &'a str,
}

/// Recognize a numbered list line; every four columns of indent nest one level
pub fn parse_list_item(line: &str) -> Option<ListLine<'_>> {
    let captures = list_item_regex().captures(line)?;

    let columns: usize = captures
        .get(1)?
        .as_str()
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();
    let level = (columns / TAB_WIDTH + 1).min(MAX_LIST_LEVEL as usize) as u8;
    let number = captures.get(2)?.as_str().parse().ok()?;
    let text = captures.get(3)?.as_str().trim();
    if text.is_empty() {
        return None;
    }

    Some(ListLine {
        level,
        number,
        text,
    })
}
