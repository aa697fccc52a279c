//! # quire-render
//!
//! Output formats for compiled quire documents.
//!
//! A [`Renderer`] turns a [`DocumentModel`] into some artifact. The model is
//! already fully resolved, so renderers only walk it.

pub mod json;
pub mod text;

use quire_core::DocumentModel;
use thiserror::Error;

pub use json::JsonRenderer;
pub use text::TextRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to serialize document model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Render a compiled document model into an output artifact
pub trait Renderer {
    type Output;

    fn render(&self, model: &DocumentModel) -> Result<Self::Output, RenderError>;
}
