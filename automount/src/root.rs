//! Root filesystem policy.
//!
//! The root volume's driver is picked in this order:
//! 1. `ramfs` when the root is populated from an initial ramdisk,
//! 2. the explicitly configured driver,
//! 3. nothing, in which case no root is mounted and boot carries on.

use crate::dispatch::mount_volume;
use crate::error::AutomountError;
use crate::sources::{ArchiveSources, InitrdOrigin};
use crate::volume::{EXTRACT_DRIVER, Volume};
use bootmount_vfs::Vfs;
use serde::{Deserialize, Serialize};

pub const ROOT_PATH: &str = "/";

/// Driver backing a root that is filled from an initial ramdisk.
pub const RAMFS_DRIVER: &str = "ramfs";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Root source device.
    pub device: String,
    /// Root filesystem driver, ignored when `initrd` is set.
    pub driver: Option<String>,
    pub flags: u64,
    pub options: String,
    /// Populate the root from this archive after mounting it.
    pub initrd: Option<InitrdOrigin>,
}

/// Volumes that bring up `/`, mounted in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootPlan<'a> {
    pub root: Volume<'a>,
    pub overlay: Option<Volume<'a>>,
}

/// Build the root volumes from `config`, or `None` when no root filesystem
/// is configured.
pub fn resolve_root(config: &RootConfig) -> Option<RootPlan<'_>> {
    let driver = match (&config.initrd, config.driver.as_deref()) {
        (Some(_), _) => RAMFS_DRIVER,
        (None, Some(driver)) if !driver.is_empty() => driver,
        _ => return None,
    };

    let root = Volume {
        source: config.device.as_str(),
        path: ROOT_PATH,
        driver,
        flags: config.flags,
        options: Some(config.options.as_str()),
        control_options: None,
    };

    let overlay = config.initrd.map(|origin| Volume {
        source: origin.as_str(),
        path: ROOT_PATH,
        driver: EXTRACT_DRIVER,
        flags: 0,
        options: Some(""),
        control_options: None,
    });

    Some(RootPlan { root, overlay })
}

/// Mount `/` and, if configured, extract the initial ramdisk into it.
pub fn mount_root<V: Vfs + ?Sized>(
    vfs: &mut V,
    sources: &ArchiveSources<'_>,
    config: &RootConfig,
) -> Result<(), AutomountError> {
    // Not having a root filesystem configured is not an error
    let Some(plan) = resolve_root(config) else {
        tracing::debug!("No root filesystem configured, skipping");
        return Ok(());
    };

    mount_volume(vfs, sources, &plan.root).inspect_err(|e| {
        tracing::error!(
            "Failed to mount {} ({}) at /: {}",
            plan.root.device(),
            plan.root.driver,
            e
        );
    })?;

    if let Some(overlay) = plan.overlay {
        mount_volume(vfs, sources, &overlay).inspect_err(|e| {
            tracing::error!(
                "Failed to extract {} ({}) to /: {}",
                overlay.source,
                overlay.driver,
                e
            );
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingVfs};

    #[test]
    fn test_no_root_configured() {
        assert!(resolve_root(&RootConfig::default()).is_none());

        let config = RootConfig {
            driver: Some(String::new()),
            ..Default::default()
        };
        assert!(resolve_root(&config).is_none());

        let mut vfs = RecordingVfs::new();
        mount_root(&mut vfs, &ArchiveSources::new(), &config).unwrap();
        assert!(vfs.calls.is_empty());
    }

    #[test]
    fn test_explicit_driver() {
        let config = RootConfig {
            device: "vblk0".to_string(),
            driver: Some("ext2".to_string()),
            flags: 1,
            options: "errors=panic".to_string(),
            initrd: None,
        };

        let plan = resolve_root(&config).unwrap();
        assert_eq!(plan.root.source, "vblk0");
        assert_eq!(plan.root.path, "/");
        assert_eq!(plan.root.driver, "ext2");
        assert_eq!(plan.root.flags, 1);
        assert_eq!(plan.root.options, Some("errors=panic"));
        assert!(plan.overlay.is_none());
    }

    #[test]
    fn test_initrd_takes_precedence() {
        let config = RootConfig {
            driver: Some("ext2".to_string()),
            initrd: Some(InitrdOrigin::Embedded),
            ..Default::default()
        };

        let plan = resolve_root(&config).unwrap();
        assert_eq!(plan.root.driver, RAMFS_DRIVER);
        assert_eq!(plan.root.source, "");

        let overlay = plan.overlay.unwrap();
        assert_eq!(overlay.driver, EXTRACT_DRIVER);
        assert_eq!(overlay.source, "embedded");
        assert_eq!(overlay.path, "/");
    }

    #[test]
    fn test_mount_root_then_extract() {
        let mut vfs = RecordingVfs::new();
        let initrd = [0u8; 1024];
        let sources = ArchiveSources::new().with_initrd0(&initrd);
        let config = RootConfig {
            initrd: Some(InitrdOrigin::Initrd0),
            ..Default::default()
        };

        mount_root(&mut vfs, &sources, &config).unwrap();

        assert_eq!(vfs.mounted_paths(), vec!["/"]);
        assert!(matches!(&vfs.calls[0], Call::Mount { driver, .. } if driver == "ramfs"));
        assert_eq!(
            vfs.calls[1],
            Call::Extract {
                path: "/".to_string(),
                len: 1024,
            }
        );
    }

    #[test]
    fn test_root_failure_skips_extract() {
        let mut vfs = RecordingVfs::new();
        vfs.fail_mount.insert("/".to_string());
        let initrd = [0u8; 16];
        let sources = ArchiveSources::new().with_initrd0(&initrd);
        let config = RootConfig {
            initrd: Some(InitrdOrigin::Initrd0),
            ..Default::default()
        };

        let err = mount_root(&mut vfs, &sources, &config).unwrap_err();

        assert!(matches!(err, AutomountError::MountFailed { .. }));
        assert_eq!(vfs.calls.len(), 1);
    }

    #[test]
    fn test_missing_initrd_after_root() {
        let mut vfs = RecordingVfs::new();
        let config = RootConfig {
            initrd: Some(InitrdOrigin::Initrd0),
            ..Default::default()
        };

        let err = mount_root(&mut vfs, &ArchiveSources::new(), &config).unwrap_err();

        assert!(matches!(err, AutomountError::ArchiveSourceNotFound(_)));
        assert_eq!(vfs.mounted_paths(), vec!["/"]);
    }

    #[test]
    fn test_config_from_json() {
        let config: RootConfig =
            serde_json::from_str(r#"{"driver": "9pfs", "device": "fs0"}"#).unwrap();
        assert_eq!(config.driver.as_deref(), Some("9pfs"));
        assert_eq!(config.options, "");
        assert_eq!(config.initrd, None);
    }
}
