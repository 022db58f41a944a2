//! In-memory [`Vfs`] that records every primitive call.

use bootmount_vfs::{Errno, MountPoint, MountTable, Vfs, VfsError};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Mount {
        source: String,
        path: String,
        driver: String,
        flags: u64,
        options: Option<String>,
    },
    Mkdir {
        path: String,
        mode: u32,
    },
    Extract {
        path: String,
        len: usize,
    },
    Unmount {
        path: String,
        flags: u64,
    },
}

#[derive(Default)]
pub struct RecordingVfs {
    pub calls: Vec<Call>,
    pub table: MountTable,
    pub existing_dirs: HashSet<String>,
    pub fail_mkdir: HashSet<String>,
    pub fail_mount: HashSet<String>,
    pub fail_unmount: HashSet<String>,
    pub fail_extract: bool,
}

impl RecordingVfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted_paths(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Mount { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn unmounted_paths(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Unmount { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Vfs for RecordingVfs {
    fn mount(
        &mut self,
        source: &str,
        path: &str,
        driver: &str,
        flags: u64,
        options: Option<&str>,
    ) -> Result<(), VfsError> {
        self.calls.push(Call::Mount {
            source: source.to_string(),
            path: path.to_string(),
            driver: driver.to_string(),
            flags,
            options: options.map(String::from),
        });
        if self.fail_mount.contains(path) {
            return Err(Errno::ENODEV.into());
        }
        self.table.push(MountPoint::new(source, path, driver, flags));
        Ok(())
    }

    fn mkdir(&mut self, path: &str, mode: u32) -> Result<(), VfsError> {
        self.calls.push(Call::Mkdir {
            path: path.to_string(),
            mode,
        });
        if self.fail_mkdir.contains(path) {
            return Err(Errno::EACCES.into());
        }
        if !self.existing_dirs.insert(path.to_string()) {
            return Err(Errno::EEXIST.into());
        }
        Ok(())
    }

    fn extract(&mut self, path: &str, archive: &[u8]) -> Result<(), VfsError> {
        self.calls.push(Call::Extract {
            path: path.to_string(),
            len: archive.len(),
        });
        if self.fail_extract {
            return Err(VfsError::Archive("corrupt archive".to_string()));
        }
        Ok(())
    }

    fn mount_table(&self) -> &MountTable {
        &self.table
    }

    fn unmount(&mut self, path: &str, flags: u64) -> Result<(), VfsError> {
        self.calls.push(Call::Unmount {
            path: path.to_string(),
            flags,
        });
        if self.fail_unmount.contains(path) {
            return Err(Errno::EBUSY.into());
        }
        self.table
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| VfsError::NotMounted(path.to_string()))
    }
}
