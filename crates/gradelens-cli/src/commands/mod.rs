//! Subcommands and the state they share.

pub mod exams;
pub mod flags;
pub mod init;
pub mod overview;
pub mod pass_rates;
pub mod rankings;
pub mod reason;
pub mod recommend;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use gradelens_core::InsightEngine;
use gradelens_reason::{create_generator, load_config_from, GradelensConfig};
use gradelens_store::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// The JSON payloads
    Json,
}

/// Resolved configuration plus global flags.
pub struct Session {
    pub config: GradelensConfig,
    pub format: OutputFormat,
}

impl Session {
    /// Load the config file and apply the `--dataset` override.
    pub fn load(
        config_path: Option<&Path>,
        dataset: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(dataset) = dataset {
            config.dataset = dataset;
        }
        tracing::debug!(dataset = %config.dataset.display(), "session ready");
        Ok(Self { config, format })
    }

    pub fn dataset_path(&self) -> &Path {
        &self.config.dataset
    }

    pub fn open_store(&self) -> Result<Arc<MemoryStore>> {
        let store = MemoryStore::open(self.dataset_path()).with_context(|| {
            format!("failed to load dataset: {}", self.dataset_path().display())
        })?;
        Ok(Arc::new(store))
    }

    /// Engine over `store` using the configured reason generator.
    pub fn engine(&self, store: &Arc<MemoryStore>) -> Result<InsightEngine> {
        let reasons = create_generator(&self.config.reason)?;
        Ok(InsightEngine::new(store.clone(), store.clone()).with_reason_generator(reasons))
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Display name of a student id, falling back to `#id`.
pub fn student_name(store: &MemoryStore, student_id: i64) -> String {
    store
        .students()
        .iter()
        .find(|s| s.id == student_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("#{student_id}"))
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}
