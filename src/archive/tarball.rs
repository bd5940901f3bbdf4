use crate::error::ShimError;
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, Entry};

use super::ArchiveExtractor;

/// Extractor for tar streams (already decompressed)
#[derive(Debug, Clone, Copy, Default)]
pub struct TarballExtractor;

impl ArchiveExtractor for TarballExtractor {
    #[tracing::instrument(skip(self, archive))]
    fn extract_entry(
        &self,
        archive: Box<dyn Read + Send>,
        entry_name: &str,
        extract_to: &Path,
    ) -> Result<PathBuf, ShimError> {
        debug!("Scanning archive for '{}'...", entry_name);
        let wanted = Path::new(entry_name);
        let mut archive = Archive::new(archive);

        let entries = archive
            .entries()
            .map_err(|e| ShimError::extraction(entry_name, format!("invalid archive: {}", e)))?;

        for entry in entries {
            let mut entry = entry
                .map_err(|e| ShimError::extraction(entry_name, format!("invalid archive: {}", e)))?;

            let entry_path = entry
                .path()
                .map_err(|e| ShimError::extraction(entry_name, format!("invalid entry path: {}", e)))?
                .into_owned();

            if !same_entry(&entry_path, wanted) || !entry.header().entry_type().is_file() {
                debug!("Skipping {:?}", entry_path);
                continue;
            }

            let dest = extract_to.join(wanted);
            debug!("Unpacking {:?} to {:?}", entry_path, dest);
            unpack_staged(&mut entry, extract_to, &dest).map_err(|e| {
                ShimError::extraction(entry_name, format!("cannot write {}: {}", dest.display(), e))
            })?;

            info!("Unpacked {}", dest.display());
            return Ok(dest);
        }

        Err(ShimError::extraction(entry_name, "entry not found in archive"))
    }
}

/// Write the entry to a temporary file next to `dest` and move it into place
/// only once every byte has arrived. A broken stream leaves `dest` untouched.
fn unpack_staged<R: Read>(entry: &mut Entry<'_, R>, dir: &Path, dest: &Path) -> io::Result<()> {
    let expected = entry.size();
    let mut staged = tempfile::Builder::new()
        .prefix(".bin-shim-")
        .tempfile_in(dir)?;

    let written = io::copy(entry, staged.as_file_mut())?;
    if written != expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("archive ended after {} of {} bytes", written, expected),
        ));
    }
    set_mode(staged.as_file(), entry.header().mode()?)?;

    staged.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode & 0o777))
}

#[cfg(not(unix))]
fn set_mode(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Compare archive paths ignoring `./` components.
fn same_entry(entry_path: &Path, wanted: &Path) -> bool {
    let significant = |p: &Path| {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>()
    };
    significant(entry_path) == significant(wanted)
}
