//! Boot-time automounter.
//!
//! Turns a root filesystem policy and a table of compact volume entries
//! into an ordered sequence of mounts, and unmounts everything again in
//! reverse order at shutdown.

mod config;
mod dispatch;
mod error;
pub mod fstab;
mod initcall;
pub mod options;
mod orchestrator;
pub mod root;
pub mod sources;
pub mod volume;

#[cfg(test)]
mod testing;

pub use bootmount_vfs::{HostVfs, MountPoint, MountTable, Vfs, VfsError};
pub use config::{AutomountConfig, CONFIG_ENV, DEFAULT_CONFIG_PATH};
pub use dispatch::mount_volume;
pub use error::{AutomountError, ConfigError};
pub use fstab::{FSTAB_CAPACITY, FstabTable, mount_fstab};
pub use initcall::{Initcall, ROOTFS_PRIORITY};
pub use orchestrator::{Automount, Phase, UnmountReport};
pub use root::{RootConfig, RootPlan, mount_root, resolve_root};
pub use sources::{ArchiveSources, InitrdOrigin};
pub use volume::Volume;
