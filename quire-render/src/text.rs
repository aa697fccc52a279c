//! Plain-text proof of a document.
//!
//! Meant for reviewing a compilation in a terminal: headings show their
//! anchors, links show what they resolved to, and the table of contents is
//! expanded in place. Index and bookmark markers are invisible, as they would
//! be on the page. Live page fields print as `#` (page) and `##` (total).

use crate::{RenderError, Renderer};
use quire_core::{
    BlockNode, Directive, DocumentModel, Emphasis, FieldSegment, LiveField, PageFurniture,
    ResolvedSpan,
};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, model: &DocumentModel) -> Result<String, RenderError> {
        let mut sections = Vec::new();

        if let Some(header) = &model.header {
            sections.push(format!("[header] {}", furniture(header)));
        }
        for block in &model.blocks {
            if let Some(text) = render_block(model, block)? {
                sections.push(text);
            }
        }
        if let Some(footer) = &model.footer {
            sections.push(format!("[footer] {}", furniture(footer)));
        }

        if sections.is_empty() {
            return Ok(String::new());
        }
        let mut out = sections.join("\n\n");
        out.push('\n');
        Ok(out)
    }
}

fn render_block(model: &DocumentModel, block: &BlockNode) -> Result<Option<String>, RenderError> {
    let mut out = String::new();

    match block {
        BlockNode::Heading {
            level,
            anchor,
            spans,
            ..
        } => {
            write!(
                out,
                "{} {} {{#{}}}",
                "#".repeat(*level as usize),
                render_spans(spans),
                anchor
            )?;
        }
        BlockNode::Paragraph { spans, .. } => out.push_str(&render_spans(spans)),
        BlockNode::ListItem {
            level,
            number,
            spans,
            ..
        } => {
            let indent = "    ".repeat(level.saturating_sub(1) as usize);
            write!(out, "{}{}. {}", indent, number, render_spans(spans))?;
        }
        BlockNode::Directive(Directive::PageBreak) => out.push_str("[page break]"),
        BlockNode::Directive(Directive::TableOfContents(toc)) => {
            out.push_str("Contents");
            for entry in model.toc_entries(toc) {
                let indent = "  ".repeat(entry.level.saturating_sub(toc.min_level) as usize);
                write!(out, "\n{}- {} (#{})", indent, entry.text, entry.anchor)?;
            }
        }
        BlockNode::Directive(Directive::IndexEntry(_) | Directive::Bookmark { .. }) => {
            return Ok(None);
        }
    }

    Ok(Some(out))
}

fn render_spans(spans: &[ResolvedSpan]) -> String {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &ResolvedSpan) -> String {
    let text = match span.emphasis {
        Emphasis::Plain => span.text.clone(),
        Emphasis::Emphasis => format!("*{}*", span.text),
        Emphasis::Strong => format!("**{}**", span.text),
    };

    match &span.link {
        Some(link) => match &link.anchor {
            Some(anchor) => format!("[{}](#{})", text, anchor),
            None => format!("[{}](?{})", text, link.target),
        },
        None => text,
    }
}

fn furniture(page: &PageFurniture) -> String {
    page.segments
        .iter()
        .map(|segment| match segment {
            FieldSegment::Text(text) => text.as_str(),
            FieldSegment::Field(LiveField::PageNumber) => "#",
            FieldSegment::Field(LiveField::TotalPages) => "##",
        })
        .collect()
}
