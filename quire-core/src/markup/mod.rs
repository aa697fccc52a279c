//! Markup tokenizer.
//!
//! Splits source text into [`Block`]s. The block layer is line oriented:
//! blank lines end a paragraph, and directive and heading lines always form
//! blocks of their own. A numbered-list line does too, except that inside an
//! open paragraph only an item numbered 1 may start a list. Everything else
//! accumulates into a paragraph whose lines are joined with single spaces. Textual blocks are
//! then split into [`Span`]s by the [`inline`] scanner, which never fails.

pub mod directives;
pub mod inline;

use quire_types::{BlockId, Diagnostic};
use serde::Serialize;

pub use inline::{parse_inline, scan_inline, InlineScan};

/// Emphasis produced by `*…*` / `_…_` (Emphasis) and `**…**` / `__…__` (Strong)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Plain,
    Emphasis,
    Strong,
}

impl Emphasis {
    /// Style name consulted for this emphasis, if any
    pub fn style_name(&self) -> Option<&'static str> {
        match self {
            Emphasis::Plain => None,
            Emphasis::Emphasis => Some("emphasis"),
            Emphasis::Strong => Some("strong"),
        }
    }
}

/// Smallest unit of inline text
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Span {
    pub text: String,
    /// Style named by `{text}[style]`
    pub style: Option<String>,
    /// Bookmark id named by `[text](#id)`, as written
    pub link: Option<String>,
    pub emphasis: Emphasis,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn styled(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Some(style.into()),
            ..Self::default()
        }
    }

    pub fn link(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn emphasized(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
            ..Self::default()
        }
    }
}

/// Directive occupying its own block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MarkerKind {
    PageBreak,
    Toc,
    IndexEntry(String),
    Bookmark(String),
}

/// Block-level token, in document order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
    ListItem { level: u8, number: u32, spans: Vec<Span> },
    Marker(MarkerKind),
}

impl Block {
    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph { spans }
            | Block::ListItem { spans, .. } => spans,
            Block::Marker(_) => &[],
        }
    }

    /// Concatenated span text
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|span| span.text.as_str()).collect()
    }
}

/// Tokenizer output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokenized {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenize a whole document
pub fn tokenize(source: &str) -> Tokenized {
    let mut tokenizer = Tokenizer::default();
    for line in source.lines() {
        tokenizer.line(line);
    }
    tokenizer.finish()
}

#[derive(Default)]
struct Tokenizer<'a> {
    blocks: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
    paragraph: Vec<&'a str>,
}

impl<'a> Tokenizer<'a> {
    fn line(&mut self, line: &'a str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.flush_paragraph();
            return;
        }

        if let Some(marker) = directives::parse_marker(trimmed) {
            self.flush_paragraph();
            self.blocks.push(Block::Marker(marker));
            return;
        }

        if let Some((level, text)) = directives::parse_heading(line) {
            self.flush_paragraph();
            let spans = self.inline(text);
            self.blocks.push(Block::Heading { level, spans });
            return;
        }

        // Only a list starting at 1 may interrupt an open paragraph
        if let Some(item) = directives::parse_list_item(line)
            .filter(|item| self.paragraph.is_empty() || item.number == 1)
        {
            self.flush_paragraph();
            let spans = self.inline(item.text);
            self.blocks.push(Block::ListItem {
                level: item.level,
                number: item.number,
                spans,
            });
            return;
        }

        self.paragraph.push(trimmed);
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        let spans = self.inline(&text);
        self.blocks.push(Block::Paragraph { spans });
    }

    /// Scan inline text for the block about to be pushed
    fn inline(&mut self, text: &str) -> Vec<Span> {
        let block = BlockId::new(self.blocks.len());
        let scan = scan_inline(text);

        for (offset, opener) in scan.unterminated {
            self.diagnostics.push(
                Diagnostic::info(
                    "inline.unterminated",
                    format!(
                        "'{}' at offset {} is never closed and is kept as text",
                        opener, offset
                    ),
                )
                .at_block(block)
                .with_context(text),
            );
        }

        scan.spans
    }

    fn finish(mut self) -> Tokenized {
        self.flush_paragraph();
        tracing::debug!(
            "Tokenized {} blocks ({} inline diagnostics)",
            self.blocks.len(),
            self.diagnostics.len()
        );
        Tokenized {
            blocks: self.blocks,
            diagnostics: self.diagnostics,
        }
    }
}
