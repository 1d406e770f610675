//! Export session - orchestrates one export request end to end
//!
//! A session owns a validated configuration, the immutable dataset and the two
//! host capabilities (archive writer, delivery host). Each request runs
//! project → encode → (bundle) → publish; requests share nothing but the
//! delivery slot.

use super::summary::{ExportError, ExportOutcome, ExportReport};
use super::trigger::TriggerControl;
use crate::config::{ExportConfig, GeoExportConfig};
use crate::core::archive::{ArchiveBundler, ArchiveFactory, ZipArchiveFactory};
use crate::core::delivery::{DeliveryHost, DeliveryManager, DeliveryReceipt, DirectoryHost};
use crate::core::encode::{self, EncodeContext, EncodedOutput, NamedBuffer};
use crate::core::projection::project;
use crate::domain::{Bounds, ExportFormat, GeoExportError, GeometryKind, OutputName, Result};
use crate::topology::Dataset;
use crate::{log_error_with_context, log_export_complete, log_export_start};
use std::sync::Arc;
use std::time::Instant;

/// One trigger per format
#[derive(Debug, Default)]
struct Triggers {
    geojson: TriggerControl,
    topojson: TriggerControl,
    shapefile: TriggerControl,
}

impl Triggers {
    fn get(&self, format: ExportFormat) -> &TriggerControl {
        match format {
            ExportFormat::GeoJson => &self.geojson,
            ExportFormat::TopoJson => &self.topojson,
            ExportFormat::Shapefile => &self.shapefile,
        }
    }
}

/// Export session
pub struct ExportSession {
    dataset: Arc<Dataset>,
    kind: GeometryKind,
    output_name: OutputName,
    object_name: String,
    bounds: Option<Bounds>,
    bundler: ArchiveBundler,
    delivery: DeliveryManager,
    triggers: Triggers,
}

impl ExportSession {
    /// Creates a session over `dataset`
    ///
    /// # Errors
    ///
    /// Returns [`GeoExportError::Configuration`] for an unknown geometry kind,
    /// an invalid output name or malformed bounds. Nothing else is set up when
    /// validation fails.
    pub fn new(
        config: &ExportConfig,
        dataset: Arc<Dataset>,
        archive: Arc<dyn ArchiveFactory>,
        host: Arc<dyn DeliveryHost>,
    ) -> Result<Self> {
        let kind = config.geometry_kind().map_err(GeoExportError::Configuration)?;
        let output_name = config.output_name().map_err(GeoExportError::Configuration)?;
        let bounds = config.bounds().map_err(GeoExportError::Configuration)?;

        tracing::debug!(
            geometry = %kind,
            output_name = %output_name,
            shapes = dataset.shapes().len(),
            arcs = dataset.arcs().len(),
            "Export session ready"
        );

        Ok(Self {
            dataset,
            kind,
            output_name,
            object_name: config.object_name(),
            bounds,
            bundler: ArchiveBundler::new(archive),
            delivery: DeliveryManager::new(host),
            triggers: Triggers::default(),
        })
    }

    /// Session with the default capabilities: ZIP archives and a [`DirectoryHost`]
    pub fn from_config(config: &GeoExportConfig, dataset: Arc<Dataset>) -> Result<Self> {
        config.validate().map_err(GeoExportError::Configuration)?;
        let host = DirectoryHost::new(
            config.delivery.staging_path(),
            &config.delivery.output_dir,
        );
        Self::new(
            &config.export,
            dataset,
            Arc::new(ZipArchiveFactory),
            Arc::new(host),
        )
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn output_name(&self) -> &OutputName {
        &self.output_name
    }

    /// The trigger for `format`; busy while an export of that format runs
    pub fn trigger(&self, format: ExportFormat) -> &TriggerControl {
        self.triggers.get(format)
    }

    pub fn delivery(&self) -> &DeliveryManager {
        &self.delivery
    }

    /// Runs one export request
    ///
    /// Returns `Ok(None)` without doing anything if an export of the same
    /// format is already running.
    ///
    /// # Errors
    ///
    /// Any projection, encoding, archive or delivery failure. Nothing is
    /// delivered when an earlier stage fails.
    pub async fn export(&self, format: ExportFormat) -> Result<Option<DeliveryReceipt>> {
        let Some(_guard) = self.triggers.get(format).try_begin() else {
            tracing::debug!(format = %format, "Export already running, ignoring request");
            return Ok(None);
        };

        let start = Instant::now();
        log_export_start!(format, self.output_name);

        match self.run(format).await {
            Ok(receipt) => {
                log_export_complete!(format, receipt.name, receipt.size_bytes, start.elapsed());
                Ok(Some(receipt))
            }
            Err(e) => {
                let context = format!("{format} export failed");
                log_error_with_context!(&e, context.as_str());
                Err(e)
            }
        }
    }

    async fn run(&self, format: ExportFormat) -> Result<DeliveryReceipt> {
        if !format.supports(self.kind) {
            return Err(GeoExportError::Unsupported(format!(
                "{} export of {} geometry",
                format, self.kind
            )));
        }

        let shapes = project(self.dataset.arcs(), self.dataset.shapes(), self.kind)?;
        let bounds = self.bounds.or_else(|| self.dataset.bounds());
        let ctx = EncodeContext {
            arcs: self.dataset.arcs(),
            bounds,
            output_name: &self.output_name,
            object_name: &self.object_name,
        };

        let buffer = match encode::encode(format, &shapes, &ctx)? {
            EncodedOutput::Single(buffer) => buffer,
            EncodedOutput::MultiFile(members) => {
                let archive = self.bundler.bundle(members).await?;
                NamedBuffer::new(self.output_name.file_name(format.extension()), archive)
            }
        };

        self.delivery.publish(&buffer.name, buffer.bytes)
    }

    /// Runs several exports concurrently and reports every outcome
    ///
    /// Requests are interleaved on the current task. Duplicate formats are
    /// collapsed, and formats the geometry kind cannot produce are skipped.
    pub async fn export_all(&self, formats: &[ExportFormat]) -> ExportReport {
        let start = Instant::now();

        let mut requested: Vec<ExportFormat> = Vec::new();
        for format in formats {
            if !requested.contains(format) {
                requested.push(*format);
            }
        }

        let runs = requested.iter().map(|&format| async move {
            let outcome = if !format.supports(self.kind) {
                tracing::warn!(
                    format = %format,
                    geometry = %self.kind,
                    "Skipping unsupported export"
                );
                ExportOutcome::Skipped(format!("{} does not support {} geometry", format, self.kind))
            } else {
                match self.export(format).await {
                    Ok(Some(receipt)) => ExportOutcome::Delivered(receipt),
                    Ok(None) => ExportOutcome::Skipped("export already running".to_string()),
                    Err(e) => ExportOutcome::Failed(ExportError::from(&e)),
                }
            };
            (format, outcome)
        });

        let mut report = ExportReport::new();
        for (format, outcome) in futures::future::join_all(runs).await {
            report.record(format, outcome);
        }
        let report = report.with_duration(start.elapsed());
        report.log_summary();
        report
    }

    /// Revokes whatever the session delivered last
    pub fn dispose(&self) -> Result<()> {
        self.delivery.dispose()
    }
}
