//! End-to-end compilation: markup text plus configuration to [`DocumentModel`].
//!
//! The phases run strictly in order:
//!
//! 1. tokenize the markup into blocks and spans
//! 2. register every bookmark
//! 3. resolve links against the finished registry
//! 4. assemble the model
//!
//! Only configuration problems fail a compilation. Irregular content is
//! reported through [`DocumentModel::diagnostics`].

use crate::assemble::{furniture, Assembler};
use crate::bookmarks::BookmarkRegistry;
use crate::config::{ConfigError, LayoutConfig, StyleSheet};
use crate::markup::tokenize;
use crate::models::DocumentModel;
use crate::style::{LayoutRecord, StyleTable};
use crate::xref::CrossReferences;

/// A resolved style table and layout, reusable across documents
#[derive(Debug, Clone)]
pub struct Compiler {
    styles: StyleTable,
    layout: LayoutRecord,
}

impl Compiler {
    pub fn new(styles: StyleTable, layout: LayoutRecord) -> Self {
        Self { styles, layout }
    }

    /// Resolve raw configuration records
    pub fn from_config(sheet: &StyleSheet, layout: &LayoutConfig) -> Result<Self, ConfigError> {
        let styles = StyleTable::resolve(sheet)?;
        let layout = LayoutRecord::resolve(layout, &styles)?;
        Ok(Self::new(styles, layout))
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn layout(&self) -> &LayoutRecord {
        &self.layout
    }

    pub fn compile(&self, source: &str) -> Result<DocumentModel, ConfigError> {
        compile(source, &self.styles, &self.layout)
    }
}

/// Compile one document
pub fn compile(
    source: &str,
    styles: &StyleTable,
    layout: &LayoutRecord,
) -> Result<DocumentModel, ConfigError> {
    let tokenized = tokenize(source);
    let mut diagnostics = tokenized.diagnostics;
    let blocks = tokenized.blocks;

    let (bookmarks, renamed) = BookmarkRegistry::from_blocks(&blocks);
    diagnostics.extend(renamed);

    let refs = CrossReferences::resolve(&blocks, &bookmarks);
    diagnostics.extend(refs.diagnostics());

    let nodes = Assembler::new(styles, &bookmarks, &refs).assemble(&blocks)?;
    let header = furniture(layout.header.as_ref(), styles)?;
    let footer = furniture(layout.footer.as_ref(), styles)?;

    tracing::info!(
        "Compiled {} blocks, {} bookmarks, {} unresolved links",
        nodes.len(),
        bookmarks.len(),
        refs.unresolved().len()
    );

    Ok(DocumentModel {
        blocks: nodes,
        layout: layout.clone(),
        styles: styles.clone(),
        bookmarks,
        header,
        footer,
        unresolved_links: refs.into_unresolved(),
        diagnostics,
    })
}
