//! Archive writer capability
//!
//! The bundler drives an [`ArchiveWriter`] through three asynchronous steps:
//! open, add named members one at a time, seal. [`ZipArchiveFactory`] is the
//! default implementation; compression runs on tokio's blocking pool.

use crate::domain::{GeoExportError, Result};
use async_trait::async_trait;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// An archive under construction
///
/// Members are appended in call order. Once [`seal`](ArchiveWriter::seal)
/// has been called the writer rejects further calls.
#[async_trait]
pub trait ArchiveWriter: Send {
    /// Appends one member; resolves once the member is fully written
    async fn add(&mut self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Closes the archive and yields its bytes
    async fn seal(&mut self) -> Result<Vec<u8>>;
}

/// Opens archive writers
#[async_trait]
pub trait ArchiveFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ArchiveWriter>>;
}

/// Writes ZIP archives with deflate compression
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveFactory;

#[async_trait]
impl ArchiveFactory for ZipArchiveFactory {
    async fn open(&self) -> Result<Box<dyn ArchiveWriter>> {
        Ok(Box::new(ZipArchiveWriter::new()))
    }
}

enum WriterState {
    Open(ZipWriter<Cursor<Vec<u8>>>),
    Sealed,
    /// An add or seal failed part way; the archive is incomplete
    Failed,
}

/// In-memory ZIP writer
pub struct ZipArchiveWriter {
    state: WriterState,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self {
            state: WriterState::Open(ZipWriter::new(Cursor::new(Vec::new()))),
        }
    }

    /// Takes the open writer, leaving `Failed` until the step completes
    fn take(&mut self) -> Result<ZipWriter<Cursor<Vec<u8>>>> {
        match std::mem::replace(&mut self.state, WriterState::Failed) {
            WriterState::Open(writer) => Ok(writer),
            WriterState::Sealed => {
                self.state = WriterState::Sealed;
                Err(GeoExportError::Archive(
                    "archive writer is already sealed".to_string(),
                ))
            }
            WriterState::Failed => Err(GeoExportError::Archive(
                "archive writer is unusable after an earlier failure".to_string(),
            )),
        }
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveWriter for ZipArchiveWriter {
    async fn add(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        let mut writer = self.take()?;
        let name = name.to_string();
        let writer = tokio::task::spawn_blocking(move || -> Result<_> {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer.start_file(name.as_str(), options)?;
            writer.write_all(&bytes)?;
            Ok(writer)
        })
        .await
        .map_err(|e| GeoExportError::Archive(format!("archive task failed: {e}")))??;
        self.state = WriterState::Open(writer);
        Ok(())
    }

    async fn seal(&mut self) -> Result<Vec<u8>> {
        let writer = self.take()?;
        let cursor = tokio::task::spawn_blocking(move || writer.finish())
            .await
            .map_err(|e| GeoExportError::Archive(format!("archive task failed: {e}")))??;
        self.state = WriterState::Sealed;
        Ok(cursor.into_inner())
    }
}
