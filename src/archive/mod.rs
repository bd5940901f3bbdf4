mod compression;
mod tarball;

use crate::error::ShimError;
use std::io::Read;
use std::path::{Path, PathBuf};

pub use compression::{Compression, decompress};
pub use tarball::TarballExtractor;

/// Trait for extractors that pull a single named entry out of an archive
/// stream
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Read `archive` until the entry `entry_name` is found and write it to
    /// `extract_to/entry_name`. Returns the written path.
    ///
    /// Implementations stop reading once the entry is written; the rest of
    /// the archive is never consumed.
    fn extract_entry(
        &self,
        archive: Box<dyn Read + Send>,
        entry_name: &str,
        extract_to: &Path,
    ) -> Result<PathBuf, ShimError>;
}
