//! Batch ingestion command.

use anyhow::{Context as _, Result};
use shelf_core::catalog::IngestBatch;

use super::IngestArgs;
use crate::context::Context;

/// Run the ingest command.
pub async fn run(args: IngestArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    tracing::debug!(path = %path.display(), "reading batch");

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
    let batch = IngestBatch::from_json(&content)
        .with_context(|| format!("Failed to parse batch file: {}", path.display()))?;

    let service = ctx.open_service().await?;
    let spinner = ctx
        .output
        .spinner(&format!("Ingesting {} listings...", batch.items.len()));
    let report = service.ingest(&batch).await;
    spinner.finish_and_clear();
    let report = report?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.success(&format!(
        "Ingested batch \"{}\" into {}",
        batch.keyword.trim(),
        service.store().backend_name()
    ));
    ctx.output.kv("received", &report.received.to_string());
    ctx.output.kv("saved", &report.saved.to_string());
    ctx.output.kv("skipped", &report.skipped.to_string());

    if report.skipped > 0 {
        ctx.output
            .warn(&format!("{} item(s) had no url and were skipped", report.skipped));
    }

    Ok(())
}
