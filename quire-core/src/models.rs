//! The compiled document model.
//!
//! Everything here is produced once per compilation and never mutated
//! afterwards. All types serialize with serde so any output format can
//! consume the model without linking against the compiler.

use crate::bookmarks::BookmarkRegistry;
use crate::fields::{FieldSegment, IndexField, TocField};
use crate::markup::Emphasis;
use crate::style::{Alignment, LayoutRecord, StyleDefinition, StyleTable};
use crate::xref::UnresolvedLink;
use quire_types::{BlockId, Diagnostic, DiagnosticSeverity};
use serde::Serialize;

/// Internal hyperlink carried by a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperlink {
    /// Target id as written
    pub target: String,
    /// Bookmark anchor, absent when the link is dangling
    pub anchor: Option<String>,
    /// Block defining the anchor
    pub block: Option<BlockId>,
}

impl Hyperlink {
    pub fn is_dangling(&self) -> bool {
        self.anchor.is_none()
    }
}

/// A span with its style fully resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpan {
    pub text: String,
    pub style: StyleDefinition,
    #[serde(skip_serializing_if = "is_plain")]
    pub emphasis: Emphasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Hyperlink>,
}

fn is_plain(emphasis: &Emphasis) -> bool {
    *emphasis == Emphasis::Plain
}

/// Paragraph-level formatting, taken from a block's first span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphFormat {
    pub style: String,
    pub alignment: Alignment,
    pub space_before: f64,
    pub space_after: f64,
}

impl ParagraphFormat {
    pub fn from_style(style: &StyleDefinition) -> Self {
        Self {
            style: style.name.clone(),
            alignment: style.alignment,
            space_before: style.space_before,
            space_after: style.space_after,
        }
    }
}

/// Non-textual block passed through to the output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    /// Hard page boundary
    PageBreak,
    TableOfContents(TocField),
    IndexEntry(IndexField),
    Bookmark { name: String, anchor: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockNode {
    Heading {
        level: u8,
        anchor: String,
        format: ParagraphFormat,
        spans: Vec<ResolvedSpan>,
    },
    Paragraph {
        format: ParagraphFormat,
        spans: Vec<ResolvedSpan>,
    },
    ListItem {
        level: u8,
        number: u32,
        format: ParagraphFormat,
        spans: Vec<ResolvedSpan>,
    },
    Directive(Directive),
}

impl BlockNode {
    pub fn spans(&self) -> &[ResolvedSpan] {
        match self {
            BlockNode::Heading { spans, .. }
            | BlockNode::Paragraph { spans, .. }
            | BlockNode::ListItem { spans, .. } => spans,
            BlockNode::Directive(_) => &[],
        }
    }

    pub fn format(&self) -> Option<&ParagraphFormat> {
        match self {
            BlockNode::Heading { format, .. }
            | BlockNode::Paragraph { format, .. }
            | BlockNode::ListItem { format, .. } => Some(format),
            BlockNode::Directive(_) => None,
        }
    }

    /// Concatenated span text
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|span| span.text.as_str()).collect()
    }
}

/// Header or footer, expanded into live fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFurniture {
    pub segments: Vec<FieldSegment>,
    pub style: StyleDefinition,
}

/// One heading as a table of contents would list it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
    pub block: BlockId,
}

/// Output of a compilation
#[derive(Debug, Clone, Serialize)]
pub struct DocumentModel {
    pub blocks: Vec<BlockNode>,
    pub layout: LayoutRecord,
    pub styles: StyleTable,
    pub bookmarks: BookmarkRegistry,
    pub header: Option<PageFurniture>,
    pub footer: Option<PageFurniture>,
    pub unresolved_links: Vec<UnresolvedLink>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentModel {
    /// Every heading in document order
    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| match block {
                BlockNode::Heading { level, anchor, .. } => Some(OutlineEntry {
                    level: *level,
                    text: block.plain_text(),
                    anchor: anchor.clone(),
                    block: BlockId::new(index),
                }),
                _ => None,
            })
            .collect()
    }

    /// Headings a table of contents field would show
    pub fn toc_entries(&self, toc: &TocField) -> Vec<OutlineEntry> {
        self.outline()
            .into_iter()
            .filter(|entry| toc.includes(entry.level))
            .collect()
    }

    pub fn block(&self, id: BlockId) -> Option<&BlockNode> {
        self.blocks.get(id.as_usize())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }
}
