//! Build command implementation.

use super::InputArgs;
use crate::OutputFormat;
use anyhow::{Context, Result};
use quire_render::{JsonRenderer, Renderer, TextRenderer};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;

/// Compile the markup and write the rendered model to `output` or stdout
pub fn build_document(
    input: &InputArgs,
    output: Option<&Path>,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    let (compiler, source) = input.load()?;
    let model = compiler
        .compile(&source)
        .with_context(|| format!("Failed to compile {:?}", input.markup))?;

    for diag in &model.diagnostics {
        tracing::debug!("{}", diag);
    }

    let rendered = match format {
        OutputFormat::Json => JsonRenderer::new(pretty).render(&model)?,
        OutputFormat::Text => TextRenderer.render(&model)?,
    };

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {:?}", path))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(stdout())
    };
    writer.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writeln!(writer)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        tracing::info!("Wrote {} blocks to {:?}", model.blocks.len(), path);
    }

    Ok(())
}
