use crate::config::AutomountConfig;
use crate::error::{AutomountError, ConfigError};
use crate::fstab::{FstabTable, mount_fstab};
use crate::root::{RootConfig, mount_root};
use crate::sources::ArchiveSources;
use bootmount_vfs::Vfs;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Mounted,
    /// Mounting stopped at an error; whatever did get mounted is still live.
    Failed,
    Unmounted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Mounted => write!(f, "mounted"),
            Phase::Failed => write!(f, "failed"),
            Phase::Unmounted => write!(f, "unmounted"),
        }
    }
}

/// Result of a teardown. Every live mount was attempted.
#[derive(Debug, Default)]
pub struct UnmountReport {
    pub unmounted: Vec<String>,
    pub failures: Vec<AutomountError>,
}

impl UnmountReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Boot-time automounter: mounts the root and the fstab once, and tears
/// every live mount down again at shutdown.
pub struct Automount<'a, V: Vfs> {
    vfs: V,
    sources: ArchiveSources<'a>,
    root: Option<RootConfig>,
    fstab: FstabTable,
    phase: Phase,
}

impl<'a, V: Vfs> Automount<'a, V> {
    pub fn new(vfs: V, root: Option<RootConfig>, fstab: FstabTable) -> Self {
        Self {
            vfs,
            sources: ArchiveSources::new(),
            root,
            fstab,
            phase: Phase::Idle,
        }
    }

    pub fn from_config(vfs: V, config: &AutomountConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(vfs, config.root.clone(), config.fstab_table()?))
    }

    pub fn with_sources(mut self, sources: ArchiveSources<'a>) -> Self {
        self.sources = sources;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn vfs(&self) -> &V {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut V {
        &mut self.vfs
    }

    pub fn into_vfs(self) -> V {
        self.vfs
    }

    /// Mount the root filesystem, then every fstab entry. Stops at the first
    /// error.
    pub fn mount_all(&mut self) -> Result<(), AutomountError> {
        self.expect_phase(&[Phase::Idle])?;

        let result = self.mount_volumes();
        self.phase = match result {
            Ok(()) => Phase::Mounted,
            Err(_) => Phase::Failed,
        };

        if result.is_ok() {
            tracing::info!(
                "Automounted {} filesystem(s)",
                self.vfs.mount_table().len()
            );
        }
        result
    }

    fn mount_volumes(&mut self) -> Result<(), AutomountError> {
        if let Some(root) = &self.root {
            mount_root(&mut self.vfs, &self.sources, root)?;
        }
        mount_fstab(&mut self.vfs, &self.sources, &self.fstab)
    }

    /// Unmount every live mount, newest first. A failing unmount is logged
    /// and the walk carries on.
    pub fn unmount_all(&mut self) -> Result<UnmountReport, AutomountError> {
        self.expect_phase(&[Phase::Mounted, Phase::Failed])?;

        let paths: Vec<String> = self
            .vfs
            .mount_table()
            .iter()
            .rev()
            .map(|m| m.path.clone())
            .collect();

        let mut report = UnmountReport::default();
        for path in paths {
            match self.vfs.unmount(&path, 0) {
                Ok(()) => report.unmounted.push(path),
                Err(e) => {
                    tracing::error!("Failed to unmount {}: {}.", path, e);
                    report
                        .failures
                        .push(AutomountError::UnmountFailed { path, cause: e });
                }
            }
        }

        self.phase = Phase::Unmounted;
        Ok(report)
    }

    fn expect_phase(&self, allowed: &[Phase]) -> Result<(), AutomountError> {
        if allowed.contains(&self.phase) {
            return Ok(());
        }

        let expected = allowed
            .iter()
            .map(Phase::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(AutomountError::InvalidState {
            expected,
            actual: self.phase.to_string(),
        })
    }
}
