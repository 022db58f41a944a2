mod archive;
mod error;
mod host;
mod table;

pub use archive::unpack;
pub use error::VfsError;
pub use host::HostVfs;
pub use table::{MountPoint, MountTable};

pub use nix::errno::Errno;

/// Privileged filesystem primitives consumed by the automounter.
///
/// Paths are absolute paths inside the VFS namespace. Implementations that
/// sit on top of a host filesystem decide how those map onto host paths.
pub trait Vfs {
    /// Mount `driver` at `path`. A successful mount is appended to the live
    /// mount table.
    fn mount(
        &mut self,
        source: &str,
        path: &str,
        driver: &str,
        flags: u64,
        options: Option<&str>,
    ) -> Result<(), VfsError>;

    /// Create a single directory. An existing directory is reported as an
    /// error for which [`VfsError::is_already_exists`] holds.
    fn mkdir(&mut self, path: &str, mode: u32) -> Result<(), VfsError>;

    /// Unpack `archive` into the directory at `path`.
    fn extract(&mut self, path: &str, archive: &[u8]) -> Result<(), VfsError>;

    /// Filesystems currently mounted, in mount order.
    fn mount_table(&self) -> &MountTable;

    /// Unmount the filesystem mounted at `path` and drop it from the table.
    fn unmount(&mut self, path: &str, flags: u64) -> Result<(), VfsError>;
}
