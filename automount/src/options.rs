//! Control options: directives the automounter applies before mounting.
//!
//! Currently implemented:
//! - `mkmp`: make mount point. Creates every missing directory leading up
//!   to and including the mount point.
//!
//! Unknown directives are ignored.

use crate::error::AutomountError;
use crate::volume::Volume;
use bootmount_vfs::Vfs;

pub const CONTROL_OPTIONS_SEP: char = ',';

pub const MKMP: &str = "mkmp";

/// Owner-only rwx.
pub const MOUNT_POINT_MODE: u32 = 0o700;

/// Apply every recognized directive in `volume.control_options`.
pub fn process_control_options<V: Vfs + ?Sized>(
    vfs: &mut V,
    volume: &Volume<'_>,
) -> Result<(), AutomountError> {
    let Some(control_options) = volume.control_options else {
        return Ok(());
    };

    for directive in control_options.split(CONTROL_OPTIONS_SEP) {
        match directive {
            // mkmp on `/` has nothing to create
            MKMP if volume.is_root() => {}
            MKMP => make_mount_point(vfs, volume.path).inspect_err(|e| {
                tracing::error!("Failed to process control option {:?}: {}", MKMP, e);
            })?,
            "" => {}
            other => tracing::debug!("Ignoring unknown control option {:?}", other),
        }
    }

    Ok(())
}

/// Create each directory component of `path`, outermost first.
///
/// The whole path is checked before anything is created, so a rejected path
/// leaves the filesystem untouched.
pub fn make_mount_point<V: Vfs + ?Sized>(vfs: &mut V, path: &str) -> Result<(), AutomountError> {
    let prefixes = mount_point_prefixes(path)?;

    for prefix in prefixes {
        match vfs.mkdir(prefix, MOUNT_POINT_MODE) {
            Ok(()) => tracing::debug!("Created mount point component {}", prefix),
            Err(e) if e.is_already_exists() => {}
            Err(e) => {
                return Err(AutomountError::MountPointCreationFailed {
                    path: prefix.to_string(),
                    cause: e,
                });
            }
        }
    }

    Ok(())
}

/// Every directory prefix of `path` that ends on a component, in order.
///
/// Repeated separators are collapsed for the purpose of finding components
/// but are kept in the returned prefixes. Rejects `.` and `..` components.
fn mount_point_prefixes(path: &str) -> Result<Vec<&str>, AutomountError> {
    if !path.starts_with('/') {
        return Err(AutomountError::InvalidPath(path.to_string()));
    }

    let mut prefixes = Vec::new();
    let mut start = 0;
    for (idx, c) in path.char_indices().chain(std::iter::once((path.len(), '/'))) {
        if c != '/' {
            continue;
        }

        let component = &path[start..idx];
        start = idx + 1;
        match component {
            "" => continue,
            "." | ".." => return Err(AutomountError::UnsafePath(path.to_string())),
            _ => prefixes.push(&path[..idx]),
        }
    }

    Ok(prefixes)
}
