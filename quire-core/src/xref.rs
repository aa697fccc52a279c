//! Cross-reference resolution.
//!
//! Runs after every bookmark is registered, so a link may point at a heading
//! that appears later in the document.

use crate::bookmarks::BookmarkRegistry;
use crate::markup::Block;
use quire_types::{BlockId, Diagnostic};
use serde::Serialize;
use std::collections::HashMap;

/// One `[text](#id)` span and what it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossLink {
    /// Block containing the link
    pub block: BlockId,
    /// Index of the link span within its block
    pub span: usize,
    /// Target id as written
    pub target: String,
    /// Block defining the target bookmark
    pub resolved: Option<BlockId>,
}

impl CrossLink {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// A link whose target matches no bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    pub block: BlockId,
    pub target: String,
    /// Visible link text
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CrossReferences {
    links: Vec<CrossLink>,
    by_span: HashMap<(BlockId, usize), usize>,
    unresolved: Vec<UnresolvedLink>,
}

impl CrossReferences {
    /// Bind every link span in `blocks` to the registry
    pub fn resolve(blocks: &[Block], registry: &BookmarkRegistry) -> Self {
        let mut refs = Self::default();

        for (index, block) in blocks.iter().enumerate() {
            let block_id = BlockId::new(index);
            for (span_index, span) in block.spans().iter().enumerate() {
                let Some(target) = &span.link else {
                    continue;
                };

                let resolved = registry.lookup(target).map(|bookmark| bookmark.block);
                if resolved.is_none() {
                    tracing::warn!(
                        "Dangling link to '#{}' in {} ('{}')",
                        target,
                        block_id,
                        span.text
                    );
                    refs.unresolved.push(UnresolvedLink {
                        block: block_id,
                        target: target.clone(),
                        text: span.text.clone(),
                    });
                }

                refs.by_span.insert((block_id, span_index), refs.links.len());
                refs.links.push(CrossLink {
                    block: block_id,
                    span: span_index,
                    target: target.clone(),
                    resolved,
                });
            }
        }

        tracing::debug!(
            "Resolved {} of {} links",
            refs.links.len() - refs.unresolved.len(),
            refs.links.len()
        );
        refs
    }

    /// The link carried by a given span, if it has one
    pub fn link(&self, block: BlockId, span: usize) -> Option<&CrossLink> {
        self.by_span.get(&(block, span)).map(|&index| &self.links[index])
    }

    pub fn links(&self) -> &[CrossLink] {
        &self.links
    }

    pub fn unresolved(&self) -> &[UnresolvedLink] {
        &self.unresolved
    }

    pub fn into_unresolved(self) -> Vec<UnresolvedLink> {
        self.unresolved
    }

    /// One `link.dangling` warning per unresolved link
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.unresolved
            .iter()
            .map(|link| {
                Diagnostic::warning(
                    "link.dangling",
                    format!("No bookmark named '{}'", link.target),
                )
                .at_block(link.block)
                .with_context(link.text.as_str())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tokenize;

    fn resolve(source: &str) -> CrossReferences {
        let blocks = tokenize(source).blocks;
        let (registry, _) = BookmarkRegistry::from_blocks(&blocks);
        CrossReferences::resolve(&blocks, &registry)
    }

    #[test]
    fn test_forward_reference_resolves() {
        let refs = resolve("See [later](#later_part).\n\n# Later Part");

        assert_eq!(refs.links().len(), 1);
        let link = refs.link(BlockId::new(0), 1).unwrap();
        assert_eq!(link.target, "later_part");
        assert_eq!(link.resolved, Some(BlockId::new(1)));
        assert!(refs.unresolved().is_empty());
    }

    #[test]
    fn test_backward_reference_and_explicit_bookmark() {
        let refs = resolve("<<<bookmark:Appendix>>>\n\nBack to [it](#appendix).");

        assert_eq!(
            refs.link(BlockId::new(1), 1).and_then(|l| l.resolved),
            Some(BlockId::new(0))
        );
    }

    #[test]
    fn test_missing_target_is_recorded_not_fatal() {
        let refs = resolve("Go [x](#missing_id) now.");

        assert_eq!(
            refs.unresolved(),
            &[UnresolvedLink {
                block: BlockId::new(0),
                target: "missing_id".to_string(),
                text: "x".to_string(),
            }]
        );
        assert!(!refs.link(BlockId::new(0), 1).unwrap().is_resolved());

        let diagnostics = refs.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "link.dangling");
        assert_eq!(diagnostics[0].context.as_deref(), Some("x"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let refs = resolve("# Intro\n\n[a](#Intro) [b](#intro)");

        assert_eq!(refs.unresolved().len(), 1);
        assert_eq!(refs.unresolved()[0].target, "Intro");
    }

    #[test]
    fn test_suffixed_ids_are_linkable() {
        let refs = resolve("# Intro\n\n# Intro\n\n[second](#intro_2)");

        assert_eq!(
            refs.link(BlockId::new(2), 0).and_then(|l| l.resolved),
            Some(BlockId::new(1))
        );
    }

    #[test]
    fn test_spans_without_links_have_no_entry() {
        let refs = resolve("plain {styled}[s] text");

        assert!(refs.links().is_empty());
        assert!(refs.link(BlockId::new(0), 0).is_none());
    }
}
