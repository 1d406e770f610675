//! Export command implementation
//!
//! Loads a dataset, runs the requested formats through one export session and
//! writes the results into the configured output directory.

use crate::config::load_config;
use crate::core::export::{ExportOutcome, ExportSession};
use crate::domain::ExportFormat;
use crate::topology::Dataset;
use clap::Args;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dataset file (`{"arcs": [...], "shapes": [...]}`)
    #[arg(short, long)]
    pub dataset: String,

    /// Format(s) to export (comma-separated: geojson, topojson, shapefile)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Override the geometry kind (polygon or polyline)
    #[arg(long)]
    pub geometry: Option<String>,

    /// Override the output file base name
    #[arg(long)]
    pub output_name: Option<String>,

    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(dataset = %self.dataset, "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(geometry) = &self.geometry {
            tracing::info!(geometry = %geometry, "Overriding geometry from CLI");
            config.export.geometry = geometry.clone();
        }
        if let Some(name) = &self.output_name {
            tracing::info!(output_name = %name, "Overriding output name from CLI");
            config.export.output_name = Some(name.clone());
        }
        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir, "Overriding output directory from CLI");
            config.delivery.output_dir = dir.clone();
        }

        let formats = match self.formats(&config.export.formats) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let dataset = match Dataset::from_file(&self.dataset) {
            Ok(d) => Arc::new(d),
            Err(e) => {
                tracing::error!(error = %e, dataset = %self.dataset, "Failed to load dataset");
                eprintln!("Failed to load dataset {}: {e}", self.dataset);
                return Ok(5);
            }
        };

        let session = match ExportSession::from_config(&config, dataset) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Exporting {} as {}", self.dataset, join_formats(&formats));
        println!();

        let report = session.export_all(&formats).await;

        println!("📊 Export Summary:");
        for outcome in &report.outcomes {
            match &outcome.outcome {
                ExportOutcome::Delivered(receipt) => println!(
                    "  ✅ {}: {} ({} bytes, sha256 {})",
                    outcome.format, receipt.location, receipt.size_bytes, receipt.sha256
                ),
                ExportOutcome::Skipped(reason) => {
                    println!("  ⏭️  {}: skipped ({reason})", outcome.format)
                }
                ExportOutcome::Failed(error) => {
                    println!("  ❌ {}: {}", outcome.format, error.message);
                    if error.environment_limitation {
                        println!("     This environment cannot deliver files.");
                    }
                }
            }
        }
        println!("  Duration: {:.2}s", report.duration.as_secs_f64());
        println!();

        // staged copies are no longer needed once the files are delivered
        if let Err(e) = session.dispose() {
            tracing::warn!(error = %e, "Failed to release delivery resources");
        }

        if report.is_successful() {
            println!("✅ Export completed successfully!");
            Ok(0)
        } else {
            println!("⚠️  Export completed with failures");
            Ok(1)
        }
    }

    /// Formats named on the command line, or `defaults` when none were given
    fn formats(&self, defaults: &[ExportFormat]) -> Result<Vec<ExportFormat>, String> {
        if self.format.is_empty() {
            return Ok(defaults.to_vec());
        }
        if self.format.iter().any(|f| f.eq_ignore_ascii_case("all")) {
            return Ok(ExportFormat::ALL.to_vec());
        }
        self.format.iter().map(|f| f.trim().parse()).collect()
    }
}

fn join_formats(formats: &[ExportFormat]) -> String {
    formats
        .iter()
        .map(ExportFormat::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
