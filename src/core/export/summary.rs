//! Export report
//!
//! Collects the per-format outcomes of one [`super::ExportSession::export_all`] run.

use crate::core::delivery::DeliveryReceipt;
use crate::domain::{ExportFormat, GeoExportError};
use std::time::Duration;

/// What happened to one requested format
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// Encoded and handed to the delivery host
    Delivered(DeliveryReceipt),
    /// Not attempted; the reason is logged
    Skipped(String),
    /// Attempted and failed
    Failed(ExportError),
}

/// Outcome for one format
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub format: ExportFormat,
    pub outcome: ExportOutcome,
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Per-format outcomes, in request order
    pub outcomes: Vec<FormatOutcome>,

    /// Wall-clock duration of the whole run
    pub duration: Duration,
}

impl ExportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn record(&mut self, format: ExportFormat, outcome: ExportOutcome) {
        self.outcomes.push(FormatOutcome { format, outcome });
    }

    pub fn delivered(&self) -> impl Iterator<Item = (ExportFormat, &DeliveryReceipt)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            ExportOutcome::Delivered(receipt) => Some((o.format, receipt)),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = (ExportFormat, &ExportError)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            ExportOutcome::Failed(error) => Some((o.format, error)),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, ExportOutcome::Skipped(_)))
            .count()
    }

    /// True when no requested format failed
    pub fn is_successful(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            requested = self.outcomes.len(),
            delivered = self.delivered().count(),
            skipped = self.skipped_count(),
            failed = self.errors().count(),
            duration_ms = self.duration.as_millis(),
            "Export run completed"
        );

        for outcome in &self.outcomes {
            if let ExportOutcome::Skipped(reason) = &outcome.outcome {
                tracing::warn!(format = %outcome.format, reason = %reason, "Export skipped");
            }
        }

        for (format, error) in self.errors() {
            tracing::warn!(
                format = %format,
                error_type = ?error.error_type,
                message = %error.message,
                "Export error"
            );
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    Configuration,
    Projection,
    Encoding,
    Unsupported,
    Archive,
    /// Delivery host failure, usually an environment limitation
    Delivery,
    Serialization,
    Io,
}

impl From<&GeoExportError> for ExportErrorType {
    fn from(error: &GeoExportError) -> Self {
        match error {
            GeoExportError::Configuration(_) => Self::Configuration,
            GeoExportError::Projection(_) => Self::Projection,
            GeoExportError::Encoding(_) => Self::Encoding,
            GeoExportError::Unsupported(_) => Self::Unsupported,
            GeoExportError::Archive(_) => Self::Archive,
            GeoExportError::Delivery(_) => Self::Delivery,
            GeoExportError::Serialization(_) => Self::Serialization,
            GeoExportError::Io(_) => Self::Io,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    pub error_type: ExportErrorType,

    pub message: String,

    /// Set when the host, not the data, caused the failure
    pub environment_limitation: bool,
}

impl ExportError {
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            environment_limitation: false,
        }
    }
}

impl From<&GeoExportError> for ExportError {
    fn from(error: &GeoExportError) -> Self {
        Self {
            error_type: error.into(),
            message: error.to_string(),
            environment_limitation: error.is_environment_limitation(),
        }
    }
}
