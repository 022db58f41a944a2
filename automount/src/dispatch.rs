use crate::error::AutomountError;
use crate::options::process_control_options;
use crate::sources::ArchiveSources;
use crate::volume::Volume;
use bootmount_vfs::Vfs;

/// Bring one volume up: apply its control options, then either extract an
/// archive into `volume.path` or mount the filesystem there.
pub fn mount_volume<V: Vfs + ?Sized>(
    vfs: &mut V,
    sources: &ArchiveSources<'_>,
    volume: &Volume<'_>,
) -> Result<(), AutomountError> {
    tracing::debug!("vfs.fstab: Mounting: {}...", volume);

    process_control_options(vfs, volume)?;

    if volume.is_extract() {
        return extract_volume(vfs, sources, volume);
    }

    vfs.mount(
        volume.source,
        volume.path,
        volume.driver,
        volume.flags,
        volume.options,
    )
    .map_err(|e| AutomountError::MountFailed {
        device: volume.device().to_string(),
        driver: volume.driver.to_string(),
        path: volume.path.to_string(),
        cause: e,
    })
}

fn extract_volume<V: Vfs + ?Sized>(
    vfs: &mut V,
    sources: &ArchiveSources<'_>,
    volume: &Volume<'_>,
) -> Result<(), AutomountError> {
    let archive = sources.resolve(volume.source)?;

    tracing::info!(
        "Extracting initrd {} ({} bytes) to {}...",
        volume.source,
        archive.len(),
        volume.path
    );

    vfs.extract(volume.path, archive).map_err(|e| {
        tracing::error!("Failed to extract archive to {}: {}", volume.path, e);
        AutomountError::ExtractionFailed {
            origin: volume.source.to_string(),
            path: volume.path.to_string(),
            cause: e,
        }
    })
}
