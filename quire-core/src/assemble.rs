//! Document model assembly.
//!
//! Attaches a resolved [`StyleDefinition`] to every span, bookmark anchors to
//! headings and links, and turns markers into [`Directive`]s.

use crate::bookmarks::BookmarkRegistry;
use crate::config::ConfigError;
use crate::fields::{parse_template, IndexField, TocField};
use crate::markup::{Block, Emphasis, MarkerKind, Span};
use crate::models::{BlockNode, Directive, Hyperlink, PageFurniture, ParagraphFormat, ResolvedSpan};
use crate::style::{FurnitureTemplate, StyleDefinition, StyleTable};
use crate::xref::CrossReferences;
use quire_types::BlockId;

pub struct Assembler<'a> {
    styles: &'a StyleTable,
    bookmarks: &'a BookmarkRegistry,
    refs: &'a CrossReferences,
}

impl<'a> Assembler<'a> {
    pub fn new(
        styles: &'a StyleTable,
        bookmarks: &'a BookmarkRegistry,
        refs: &'a CrossReferences,
    ) -> Self {
        Self {
            styles,
            bookmarks,
            refs,
        }
    }

    /// Assemble every block in order, stopping at the first unknown style
    pub fn assemble(&self, blocks: &[Block]) -> Result<Vec<BlockNode>, ConfigError> {
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| self.block(BlockId::new(index), block))
            .collect()
    }

    pub fn block(&self, id: BlockId, block: &Block) -> Result<BlockNode, ConfigError> {
        let node = match block {
            Block::Heading { level, spans } => {
                let base = self.block_style(&format!("heading{}", level));
                let spans = self.spans(id, base, spans)?;
                BlockNode::Heading {
                    level: *level,
                    anchor: self.anchor(id),
                    format: paragraph_format(&spans, base),
                    spans,
                }
            }
            Block::Paragraph { spans } => {
                let base = self.styles.default_style();
                let spans = self.spans(id, base, spans)?;
                BlockNode::Paragraph {
                    format: paragraph_format(&spans, base),
                    spans,
                }
            }
            Block::ListItem {
                level,
                number,
                spans,
            } => {
                let base = self.block_style(&format!("list{}", level));
                let spans = self.spans(id, base, spans)?;
                BlockNode::ListItem {
                    level: *level,
                    number: *number,
                    format: paragraph_format(&spans, base),
                    spans,
                }
            }
            Block::Marker(marker) => BlockNode::Directive(self.directive(id, marker)),
        };
        Ok(node)
    }

    /// Block default: the named style when the table has it, else `normal`
    fn block_style(&self, name: &str) -> &'a StyleDefinition {
        self.styles
            .get(name)
            .unwrap_or_else(|| self.styles.default_style())
    }

    fn anchor(&self, id: BlockId) -> String {
        self.bookmarks
            .for_block(id)
            .map(|bookmark| bookmark.id.clone())
            .unwrap_or_default()
    }

    fn spans(
        &self,
        id: BlockId,
        base: &StyleDefinition,
        spans: &[Span],
    ) -> Result<Vec<ResolvedSpan>, ConfigError> {
        spans
            .iter()
            .enumerate()
            .map(|(index, span)| {
                Ok(ResolvedSpan {
                    text: span.text.clone(),
                    style: self.span_style(id, base, span)?,
                    emphasis: span.emphasis,
                    link: self.hyperlink(id, index, span),
                })
            })
            .collect()
    }

    fn span_style(
        &self,
        id: BlockId,
        base: &StyleDefinition,
        span: &Span,
    ) -> Result<StyleDefinition, ConfigError> {
        if let Some(name) = &span.style {
            return self
                .styles
                .require(name, &format!("span in {}", id))
                .cloned();
        }

        let Some(name) = span.emphasis.style_name() else {
            return Ok(base.clone());
        };
        if let Some(style) = self.styles.get(name) {
            return Ok(style.clone());
        }

        let mut style = base.clone();
        match span.emphasis {
            Emphasis::Strong => style.bold = true,
            Emphasis::Emphasis => style.italic = true,
            Emphasis::Plain => {}
        }
        Ok(style)
    }

    fn hyperlink(&self, id: BlockId, index: usize, span: &Span) -> Option<Hyperlink> {
        let target = span.link.as_ref()?;
        let block = self.refs.link(id, index).and_then(|link| link.resolved);
        Some(Hyperlink {
            target: target.clone(),
            anchor: block.map(|_| target.clone()),
            block,
        })
    }

    fn directive(&self, id: BlockId, marker: &MarkerKind) -> Directive {
        match marker {
            MarkerKind::PageBreak => Directive::PageBreak,
            MarkerKind::Toc => Directive::TableOfContents(TocField::default()),
            MarkerKind::IndexEntry(term) => Directive::IndexEntry(IndexField { term: term.clone() }),
            MarkerKind::Bookmark(name) => Directive::Bookmark {
                name: name.clone(),
                anchor: self.anchor(id),
            },
        }
    }
}

fn paragraph_format(spans: &[ResolvedSpan], base: &StyleDefinition) -> ParagraphFormat {
    let style = spans.first().map_or(base, |span| &span.style);
    ParagraphFormat::from_style(style)
}

/// Expand a header/footer template into live fields
pub fn furniture(
    template: Option<&FurnitureTemplate>,
    styles: &StyleTable,
) -> Result<Option<PageFurniture>, ConfigError> {
    let Some(template) = template else {
        return Ok(None);
    };
    let style = styles.require(&template.style, "layout")?.clone();
    Ok(Some(PageFurniture {
        segments: parse_template(&template.text),
        style,
    }))
}
