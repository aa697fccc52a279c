//! Compile without writing output and surface diagnostics.

use super::InputArgs;
use anyhow::{Context, Result};
use quire_types::{Diagnostic, DiagnosticSeverity};
use serde::Serialize;

#[derive(Serialize)]
struct CheckSummary<'a> {
    blocks: usize,
    bookmarks: usize,
    unresolved_links: usize,
    warnings: usize,
    infos: usize,
    diagnostics: &'a [Diagnostic],
}

/// Run the compiler and report what it found.
///
/// Configuration problems fail the command; content diagnostics do not.
pub fn check_document(input: &InputArgs, json: bool) -> Result<()> {
    let (compiler, source) = input.load()?;
    let model = compiler
        .compile(&source)
        .with_context(|| format!("Failed to compile {:?}", input.markup))?;

    let count = |severity: DiagnosticSeverity| {
        model
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    };

    let summary = CheckSummary {
        blocks: model.blocks.len(),
        bookmarks: model.bookmarks.len(),
        unresolved_links: model.unresolved_links.len(),
        warnings: count(DiagnosticSeverity::Warning),
        infos: count(DiagnosticSeverity::Info),
        diagnostics: &model.diagnostics,
    };

    if json {
        let payload = serde_json::to_string_pretty(&summary)?;
        println!("{}", payload);
    } else {
        println!(
            "Check complete: {} blocks, {} bookmarks, {} warnings, {} info",
            summary.blocks, summary.bookmarks, summary.warnings, summary.infos
        );
        for diag in &model.diagnostics {
            println!("- {}", diag);
            if let Some(ctx) = &diag.context {
                println!("  context: {}", ctx);
            }
        }
    }

    Ok(())
}
