//! Export orchestration
//!
//! - [`coordinator`] - [`ExportSession`], one request end to end
//! - [`trigger`] - per-format idle/busy [`TriggerControl`]
//! - [`summary`] - [`ExportReport`] for multi-format runs

pub mod coordinator;
pub mod summary;
pub mod trigger;

pub use coordinator::ExportSession;
pub use summary::{ExportError, ExportErrorType, ExportOutcome, ExportReport, FormatOutcome};
pub use trigger::{TriggerControl, TriggerGuard};
