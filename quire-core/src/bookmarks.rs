//! Bookmark registry: one unique anchor id per heading and explicit bookmark.

use crate::markup::{Block, MarkerKind};
use crate::slug::slugify;
use quire_types::{BlockId, Diagnostic};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Base id used when a label has no alphanumeric characters at all
pub const FALLBACK_SLUG: &str = "bookmark";

/// Where a bookmark came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkSource {
    Heading,
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    /// Unique anchor id
    pub id: String,
    /// Slug before collision suffixing
    pub candidate: String,
    /// Heading text or bookmark name as written
    pub label: String,
    pub source: BookmarkSource,
    /// Defining block
    pub block: BlockId,
}

impl Bookmark {
    /// Whether a collision forced a numeric suffix
    pub fn was_renamed(&self) -> bool {
        self.id != self.candidate
    }
}

/// All bookmarks of a document, in registration order
#[derive(Debug, Clone, Default)]
pub struct BookmarkRegistry {
    bookmarks: Vec<Bookmark>,
    by_id: HashMap<String, usize>,
    by_block: HashMap<BlockId, usize>,
}

impl BookmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every heading and explicit bookmark marker in document order.
    ///
    /// Returns the registry plus one info diagnostic per renamed bookmark.
    pub fn from_blocks(blocks: &[Block]) -> (Self, Vec<Diagnostic>) {
        let mut registry = Self::new();
        let mut diagnostics = Vec::new();

        for (index, block) in blocks.iter().enumerate() {
            let (label, source) = match block {
                Block::Heading { .. } => (block.plain_text(), BookmarkSource::Heading),
                Block::Marker(MarkerKind::Bookmark(name)) => {
                    (name.clone(), BookmarkSource::Explicit)
                }
                _ => continue,
            };

            let block = BlockId::new(index);
            let bookmark = registry.register(&label, source, block);
            if bookmark.was_renamed() {
                diagnostics.push(
                    Diagnostic::info(
                        "bookmark.renamed",
                        format!(
                            "Bookmark '{}' is already taken; using '{}'",
                            bookmark.candidate, bookmark.id
                        ),
                    )
                    .at_block(block)
                    .with_context(label.as_str()),
                );
            }
        }

        tracing::debug!("Registered {} bookmarks", registry.len());
        (registry, diagnostics)
    }

    /// Register one label.
    ///
    /// The first use of a slug keeps it unchanged; later uses get `_2`, `_3`,
    /// … (the first free suffix).
    pub fn register(&mut self, label: &str, source: BookmarkSource, block: BlockId) -> &Bookmark {
        let mut candidate = slugify(label);
        if candidate.is_empty() {
            candidate = FALLBACK_SLUG.to_string();
        }

        let mut id = candidate.clone();
        let mut suffix = 2;
        while self.by_id.contains_key(&id) {
            id = format!("{}_{}", candidate, suffix);
            suffix += 1;
        }

        let index = self.bookmarks.len();
        self.by_id.insert(id.clone(), index);
        self.by_block.entry(block).or_insert(index);
        self.bookmarks.push(Bookmark {
            id,
            candidate,
            label: label.to_string(),
            source,
            block,
        });
        &self.bookmarks[index]
    }

    /// Exact, case-sensitive lookup by id
    pub fn lookup(&self, id: &str) -> Option<&Bookmark> {
        self.by_id.get(id).map(|&index| &self.bookmarks[index])
    }

    /// Bookmark defined by a given block
    pub fn for_block(&self, block: BlockId) -> Option<&Bookmark> {
        self.by_block.get(&block).map(|&index| &self.bookmarks[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.iter()
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}

impl Serialize for BookmarkRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.bookmarks)
    }
}
