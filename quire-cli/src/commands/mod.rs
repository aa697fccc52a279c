//! CLI command implementations.

pub mod build;
pub mod check;

pub use build::build_document;
pub use check::check_document;

use anyhow::{Context, Result};
use clap::Args;
use quire_core::{Compiler, LayoutConfig, StyleSheet};
use std::fs;
use std::path::PathBuf;

/// Files every command compiles from
#[derive(Args)]
pub struct InputArgs {
    /// Markup source file
    #[arg(short, long)]
    pub markup: PathBuf,

    /// Style table (YAML, `styles:` key)
    #[arg(short, long)]
    pub styles: PathBuf,

    /// Page layout (YAML, `layout:` key)
    #[arg(short, long)]
    pub layout: PathBuf,
}

impl InputArgs {
    /// Resolve configuration and read the markup source
    pub fn load(&self) -> Result<(Compiler, String)> {
        tracing::debug!("Loading styles from {:?}", self.styles);
        let sheet = StyleSheet::from_file(&self.styles)
            .with_context(|| format!("Failed to load styles from {:?}", self.styles))?;

        tracing::debug!("Loading layout from {:?}", self.layout);
        let layout = LayoutConfig::from_file(&self.layout)
            .with_context(|| format!("Failed to load layout from {:?}", self.layout))?;

        let compiler =
            Compiler::from_config(&sheet, &layout).context("Invalid style or layout configuration")?;

        let source = fs::read_to_string(&self.markup)
            .with_context(|| format!("Failed to read markup from {:?}", self.markup))?;

        Ok((compiler, source))
    }
}
