//! Implementation of the `product-search seed` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{create_progress_bar, output, CommandOutput};
use crate::domain::models::{Catalog, Config};
use crate::infrastructure::setup;
use crate::services::SeedReport;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON catalog to seed from (defaults to seeding.catalog_path, then the bundled catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Products per embedding request and upsert (overrides seeding.batch_size)
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

/// Result of a completed seeding run.
#[derive(Debug, Serialize)]
pub struct SeedOutput {
    /// Always true; failures exit through the error path.
    pub success: bool,
    /// Catalog path, or `bundled`.
    pub source: String,
    /// Products in the catalog.
    pub products: usize,
    /// Batches committed.
    pub batches: usize,
    /// Records upserted.
    pub records: usize,
    /// Run start.
    pub started_at: DateTime<Utc>,
    /// Run end.
    pub finished_at: DateTime<Utc>,
}

impl SeedOutput {
    fn new(source: String, products: usize, report: SeedReport) -> Self {
        Self {
            success: true,
            source,
            products,
            batches: report.batches,
            records: report.records,
            started_at: report.started_at,
            finished_at: report.finished_at,
        }
    }
}

impl CommandOutput for SeedOutput {
    fn to_human(&self) -> String {
        let elapsed = self.finished_at - self.started_at;
        format!(
            "{} Seeded {} products from {} in {} batch(es) ({} records, {:.1}s)",
            console::style("✓").green().bold(),
            self.products,
            self.source,
            self.batches,
            self.records,
            elapsed.num_milliseconds() as f64 / 1000.0
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load the catalog named on the command line or in config, falling back to
/// the bundled one.
fn load_catalog(path: Option<&Path>) -> Result<(Catalog, String)> {
    match path {
        Some(path) => {
            let catalog = Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok((catalog, path.display().to_string()))
        }
        None => {
            let catalog = Catalog::bundled().context("Bundled catalog is invalid")?;
            Ok((catalog, "bundled catalog".to_string()))
        }
    }
}

/// Load the catalog and seed the index.
pub async fn execute(args: SeedArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut config = config.clone();
    if let Some(batch_size) = args.batch_size {
        anyhow::ensure!(batch_size > 0, "--batch-size must be at least 1");
        config.seeding.batch_size = batch_size;
    }

    let path = args
        .catalog
        .or_else(|| config.seeding.catalog_path.as_ref().map(PathBuf::from));
    let (catalog, source) = load_catalog(path.as_deref())?;

    let service = setup::seeding_service(&config).context("Failed to configure seeding")?;

    let total_batches = catalog.len().div_ceil(service.batch_size());
    let pb = create_progress_bar(total_batches as u64, json_mode);
    pb.set_message("seeding");

    let result = service
        .seed_with_progress(&catalog, |progress| {
            pb.set_message(format!(
                "batch {}/{} ({} records)",
                progress.batch, progress.total_batches, progress.records
            ));
            pb.inc(1);
        })
        .await;

    match result {
        Ok(report) => {
            pb.finish_and_clear();
            output(&SeedOutput::new(source, catalog.len(), report), json_mode);
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e).context("Embedding generation failed or could not seed the vector index")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bundled_catalog_by_default() {
        let (catalog, source) = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(source, "bundled catalog");
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":"x1","name":"Mug","description":"Ceramic mug","price":12,
                "category":"Kitchen","brand":"Clay","rating":4,"inStock":true,
                "image":"https://example.com/mug.jpg","colors":["white"],"features":[]}]"#,
        )
        .unwrap();

        let (catalog, source) = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(source.ends_with("catalog.json"));
    }

    #[test]
    fn test_load_missing_catalog_fails() {
        assert!(load_catalog(Some(Path::new("/nonexistent/catalog.json"))).is_err());
    }
}
