//! # quire-core
//!
//! Core library for the quire document compiler.
//!
//! This crate turns lightweight markup plus a style table and a page layout
//! into a [`DocumentModel`]: resolved blocks, bookmarks, cross references and
//! live field descriptors, ready for any output format to serialize.

pub mod assemble;
pub mod bookmarks;
pub mod compiler;
pub mod config;
pub mod fields;
pub mod markup;
pub mod models;
pub mod slug;
pub mod style;
pub mod xref;

pub use bookmarks::{Bookmark, BookmarkRegistry, BookmarkSource};
pub use compiler::{compile, Compiler};
pub use config::{ConfigError, LayoutConfig, StyleConfig, StyleSheet};
pub use fields::{FieldSegment, IndexField, LiveField, TocField};
pub use markup::{tokenize, Block, Emphasis, MarkerKind, Span};
pub use models::{
    BlockNode, Directive, DocumentModel, Hyperlink, OutlineEntry, PageFurniture, ParagraphFormat,
    ResolvedSpan,
};
pub use slug::slugify;
pub use style::{Alignment, Color, LayoutRecord, StyleDefinition, StyleTable, Unit};
pub use xref::{CrossLink, CrossReferences, UnresolvedLink};

pub use quire_types::{BlockId, Diagnostic, DiagnosticSeverity};
