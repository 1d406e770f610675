//! Archive bundling for multi-file formats
//!
//! - [`writer`] - the asynchronous archive-writer capability and its ZIP implementation
//! - [`bundler`] - the ordered open / add / seal protocol

pub mod bundler;
pub mod writer;

pub use bundler::ArchiveBundler;
pub use writer::{ArchiveFactory, ArchiveWriter, ZipArchiveFactory, ZipArchiveWriter};
