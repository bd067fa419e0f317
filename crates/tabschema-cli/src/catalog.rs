//! # Catalog Loading
//!
//! Resolves the effective [`CatalogConfig`] from the `--config` YAML file,
//! the `TABSCHEMA_*` environment, and command-line flags (later layers win),
//! then opens the schema catalog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use tabschema_schema::{CatalogConfig, PatternPolicy, SchemaCatalog};

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Schema description CSV. Required; accepted before or after the
    /// subcommand.
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Directory holding one folder per source. Defaults to the directory
    /// of the schema file.
    #[arg(long, global = true)]
    pub data_root: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fail when rows of one source declare different file patterns.
    #[arg(long, global = true)]
    pub reject_conflicting_patterns: bool,
}

impl CatalogArgs {
    /// The effective configuration, reading the process environment.
    pub fn load_config(&self) -> Result<CatalogConfig> {
        self.load_config_with(|var| std::env::var(var).ok())
    }

    /// The effective configuration, reading variables through `lookup`.
    pub fn load_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<CatalogConfig> {
        let base = match &self.config {
            Some(path) => CatalogConfig::from_yaml_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => CatalogConfig::default(),
        };
        let mut config = base
            .apply_env_with(lookup)
            .context("invalid TABSCHEMA_* environment variable")?;

        if let Some(root) = &self.data_root {
            config.data_root = Some(root.clone());
        }
        if self.reject_conflicting_patterns {
            config.pattern_policy = PatternPolicy::Reject;
        }

        tracing::debug!(
            data_root = ?config.data_root,
            pattern_policy = %config.pattern_policy,
            delimiter = ?config.delimiter,
            "resolved configuration"
        );
        Ok(config)
    }

    /// Load the configuration and open the schema catalog.
    pub fn open_catalog(&self) -> Result<SchemaCatalog> {
        self.schema_path()?;
        let config = self.load_config()?;
        self.open_catalog_with(&config)
    }

    /// Open the schema catalog with an already resolved configuration.
    pub fn open_catalog_with(&self, config: &CatalogConfig) -> Result<SchemaCatalog> {
        let schema = self.schema_path()?;
        SchemaCatalog::open(schema, config)
            .with_context(|| format!("loading schema {}", schema.display()))
    }

    /// The `--schema` path.
    pub fn schema_path(&self) -> Result<&Path> {
        self.schema
            .as_deref()
            .context("the --schema <PATH> option is required")
    }
}
