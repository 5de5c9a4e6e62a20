//! Configuration management commands.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use shelf_core::search::MAX_PER_PAGE;
use shelf_core::stats::MAX_BINS;
use shelf_store::StoreKind;
use tracing_subscriber::EnvFilter;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force, path } => init_config(force, &path, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    let store = ctx.store_config();
    ctx.output.info("[store]");
    ctx.output.kv("backend", store.backend.as_str());
    ctx.output.kv("sqlite_path", &store.sqlite_path.display().to_string());
    ctx.output.kv("document_path", &store.document_path.display().to_string());

    ctx.output.info("[stats]");
    ctx.output.kv("bins", &ctx.config.stats.bins.to_string());
    ctx.output.kv("top_n", &ctx.config.stats.top_n.to_string());

    ctx.output.info("[search]");
    ctx.output.kv("per_page", &ctx.config.search.per_page.to_string());

    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);

    Ok(())
}

async fn init_config(force: bool, path: &str, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(path);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if config_path.extension().is_some_and(|e| e == "json") {
        CliConfig::default().save(&config_path)?;
    } else {
        fs::write(&config_path, generate_default_config())?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

/// Problems found in a configuration.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn check_config(config: &CliConfig, store_dir: &Path) -> Findings {
    let mut findings = Findings::default();

    if config.stats.bins <= 0 {
        findings
            .warnings
            .push(format!("stats.bins = {} falls back to the default", config.stats.bins));
    } else if config.stats.bins > MAX_BINS as i64 {
        findings.warnings.push(format!(
            "stats.bins = {} is capped at {}",
            config.stats.bins, MAX_BINS
        ));
    }
    if config.stats.top_n <= 0 {
        findings
            .warnings
            .push(format!("stats.top_n = {} falls back to the default", config.stats.top_n));
    }
    if !(1..=MAX_PER_PAGE).contains(&config.search.per_page) {
        findings.warnings.push(format!(
            "search.per_page = {} is clamped to 1-{}",
            config.search.per_page, MAX_PER_PAGE
        ));
    }

    if let Err(e) = EnvFilter::try_new(&config.log.level) {
        findings
            .errors
            .push(format!("log.level '{}' is not a valid filter: {}", config.log.level, e));
    }

    let path = match config.store.backend {
        StoreKind::Sqlite => &config.store.sqlite_path,
        StoreKind::Document => &config.store.document_path,
    };
    if path.as_os_str().is_empty() {
        findings
            .errors
            .push(format!("store path for the {} backend is empty", config.store.backend));
    } else {
        let full = store_dir.join(path);
        if full.is_dir() {
            findings
                .errors
                .push(format!("store path {} is a directory", full.display()));
        } else if !full.exists() {
            findings
                .warnings
                .push(format!("store file {} does not exist yet and will be created", full.display()));
        }
    }

    if config.store.backend == StoreKind::Document
        && config.store.document_path.extension().map_or(true, |e| e != "jsonl")
    {
        findings
            .warnings
            .push("store.document_path usually ends in .jsonl".to_string());
    }

    findings
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let findings = check_config(&ctx.config, &ctx.base_dir());

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": findings.errors.is_empty(),
            "errors": findings.errors,
            "warnings": findings.warnings,
        }));
    }

    // Print results
    if findings.errors.is_empty() && findings.warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &findings.errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &findings.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !findings.errors.is_empty() {
        bail!("Configuration has {} error(s)", findings.errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_errors() {
        let dir = tempfile::tempdir().unwrap();
        let findings = check_config(&CliConfig::default(), dir.path());
        assert!(findings.errors.is_empty());
        // The database file has not been created yet.
        assert_eq!(findings.warnings.len(), 1);
    }

    #[test]
    fn test_oversized_bins_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.stats.bins = i64::MAX;

        let findings = check_config(&config, dir.path());
        assert!(findings.errors.is_empty());
        assert!(findings
            .warnings
            .iter()
            .any(|w| w == &format!("stats.bins = {} is capped at {}", i64::MAX, MAX_BINS)));
    }

    #[test]
    fn test_bad_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.stats.bins = 0;
        config.search.per_page = 1000;
        config.log.level = "shelf=loud".to_string();
        config.store.sqlite_path = dir.path().to_path_buf();

        let findings = check_config(&config, dir.path());
        assert_eq!(findings.errors.len(), 2);
        assert_eq!(findings.warnings.len(), 2);
    }
}
