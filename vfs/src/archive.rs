//! Archive unpacking for the extraction code path.
//!
//! Archives are ustar images, optionally gzip-compressed. Compression is
//! detected from the leading magic bytes rather than from a file name since
//! the archive arrives as a raw memory region.

use crate::error::VfsError;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;
use tar::Archive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpacks `data` into `target_dir`, overwriting existing files.
///
/// `target_dir` must already exist; creating mount points is left to the
/// caller. Entries that would land outside `target_dir` are skipped by `tar`.
pub fn unpack(data: &[u8], target_dir: &Path) -> Result<usize, VfsError> {
    if !target_dir.is_dir() {
        return Err(VfsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("extraction target {} is not a directory", target_dir.display()),
        )));
    }

    if data.starts_with(&GZIP_MAGIC) {
        unpack_from(GzDecoder::new(data), target_dir)
    } else {
        unpack_from(data, target_dir)
    }
}

fn unpack_from<R: Read>(reader: R, target_dir: &Path) -> Result<usize, VfsError> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let mut unpacked = 0;
    for entry in archive
        .entries()
        .map_err(|e| VfsError::Archive(format!("failed to read archive: {}", e)))?
    {
        let mut entry =
            entry.map_err(|e| VfsError::Archive(format!("failed to read entry: {}", e)))?;

        let path = entry
            .path()
            .map_err(|e| VfsError::Archive(format!("failed to get entry path: {}", e)))?
            .into_owned();

        tracing::trace!(path = %path.display(), "Unpacking entry");

        entry.unpack_in(target_dir).map_err(|e| {
            VfsError::Archive(format!("failed to unpack {}: {}", path.display(), e))
        })?;
        unpacked += 1;
    }

    Ok(unpacked)
}
