use crate::error::VfsError;
use crate::table::{MountPoint, MountTable};
use crate::{Vfs, archive};
use nix::mount::{MntFlags, MsFlags, mount, umount2};
use nix::sys::stat::Mode;
use nix::unistd::mkdir;
use std::path::{Component, Path, PathBuf};

/// [`Vfs`] backed by the host kernel.
///
/// VFS paths are resolved below `root`, so a staging directory can stand in
/// for `/`. Mounting and unmounting need the usual host privileges; mkdir and
/// extraction do not.
pub struct HostVfs {
    root: PathBuf,
    table: MountTable,
}

impl HostVfs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            table: MountTable::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an absolute VFS path onto the host filesystem.
    ///
    /// The path is resolved lexically first: `.` is dropped and `..` never
    /// climbs above `/`, so the result always stays below `root`.
    pub fn host_path(&self, path: &str) -> PathBuf {
        let mut resolved = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(name) => resolved.push(name),
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }

        if resolved.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(resolved)
        }
    }
}

impl Vfs for HostVfs {
    fn mount(
        &mut self,
        source: &str,
        path: &str,
        driver: &str,
        flags: u64,
        options: Option<&str>,
    ) -> Result<(), VfsError> {
        let target = self.host_path(path);
        let device = if source.is_empty() { "none" } else { source };

        tracing::info!(
            "Mounting {} ({}) at {:?} with flags {:#x}, options {:?}",
            device,
            driver,
            target,
            flags,
            options
        );

        mount(
            Some(device),
            &target,
            Some(driver),
            MsFlags::from_bits_truncate(flags as _),
            options,
        )?;

        self.table.push(MountPoint::new(source, path, driver, flags));
        tracing::info!("Mounted {} at {:?}", driver, target);
        Ok(())
    }

    fn mkdir(&mut self, path: &str, mode: u32) -> Result<(), VfsError> {
        let target = self.host_path(path);
        tracing::debug!("Creating directory {:?} ({:o})", target, mode);
        mkdir(&target, Mode::from_bits_truncate(mode as _))?;
        Ok(())
    }

    fn extract(&mut self, path: &str, data: &[u8]) -> Result<(), VfsError> {
        let target = self.host_path(path);
        let count = archive::unpack(data, &target)?;
        tracing::debug!("Unpacked {} entries into {:?}", count, target);
        Ok(())
    }

    fn mount_table(&self) -> &MountTable {
        &self.table
    }

    fn unmount(&mut self, path: &str, flags: u64) -> Result<(), VfsError> {
        if !self.table.iter().any(|m| m.path == path) {
            return Err(VfsError::NotMounted(path.to_string()));
        }

        let target = self.host_path(path);
        tracing::debug!("Unmounting {:?}", target);

        umount2(&target, MntFlags::from_bits_truncate(flags as _))?;
        self.table.remove(path);

        tracing::info!("Unmounted {:?}", target);
        Ok(())
    }
}
