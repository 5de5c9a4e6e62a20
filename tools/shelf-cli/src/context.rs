//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shelf_store::{open_store, ListingService, StoreConfig};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, Path::new(path));
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd, &output) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path, output: &Output) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => output.warn(&format!("Ignoring {:#}", e)),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory relative store paths are resolved against: the config
    /// file's directory, or the working directory without one.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Store configuration with paths made absolute.
    pub fn store_config(&self) -> StoreConfig {
        let base = self.base_dir();
        let store = &self.config.store;
        StoreConfig {
            backend: store.backend,
            sqlite_path: resolve(&base, &store.sqlite_path),
            document_path: resolve(&base, &store.document_path),
        }
    }

    /// Open the configured store and wrap it in a service.
    pub async fn open_service(&self) -> Result<ListingService> {
        let store_config = self.store_config();
        let spinner = self
            .output
            .spinner(&format!("Opening {} store...", store_config.backend));

        let store = open_store(&store_config).await;
        spinner.finish_and_clear();

        let store = store.with_context(|| {
            format!(
                "Store unavailable ({} at {})",
                store_config.backend,
                store_config.active_path().display()
            )
        })?;
        Ok(ListingService::new(store))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, Path::new(path))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config_path: Option<PathBuf>, cwd: PathBuf) -> Context {
        Context {
            config: CliConfig::default(),
            config_path,
            output: Output::new(true),
            cwd,
        }
    }

    #[test]
    fn test_store_paths_follow_config_file() {
        let ctx = context(
            Some(PathBuf::from("/srv/shelf/shelf.toml")),
            PathBuf::from("/home/user"),
        );
        let store = ctx.store_config();
        assert_eq!(store.sqlite_path, PathBuf::from("/srv/shelf/data/shelf.db"));
        assert_eq!(store.document_path, PathBuf::from("/srv/shelf/data/listings.jsonl"));
    }

    #[test]
    fn test_store_paths_without_config_use_cwd() {
        let ctx = context(None, PathBuf::from("/home/user"));
        assert_eq!(
            ctx.store_config().sqlite_path,
            PathBuf::from("/home/user/data/shelf.db")
        );
        assert_eq!(ctx.resolve_path("/tmp/batch.json"), PathBuf::from("/tmp/batch.json"));
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shelf.toml"), "[search]\nper_page = 7\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = Context::find_config(&nested, &Output::new(true)).unwrap();
        assert_eq!(config.search.per_page, 7);
        assert_eq!(path, dir.path().join("shelf.toml"));
    }
}
