//! Hooks into the surrounding init/teardown sequence.

use crate::error::AutomountError;
use crate::orchestrator::Automount;
use bootmount_vfs::Vfs;

/// Priority of the automounter within the rootfs init class. Runs after
/// memory and platform discovery.
pub const ROOTFS_PRIORITY: u8 = 4;

/// A subsystem with one boot-time and one shutdown-time entry point.
///
/// The init sequencer calls `init` in ascending priority and `term` in the
/// reverse order. A failing `init` is fatal for boot; `term` cannot fail.
pub trait Initcall {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u8;

    fn init(&mut self) -> Result<(), AutomountError>;

    fn term(&mut self);
}

impl<V: Vfs> Initcall for Automount<'_, V> {
    fn name(&self) -> &'static str {
        "vfs.automount"
    }

    fn priority(&self) -> u8 {
        ROOTFS_PRIORITY
    }

    fn init(&mut self) -> Result<(), AutomountError> {
        self.mount_all()
    }

    fn term(&mut self) {
        match self.unmount_all() {
            Ok(report) if !report.is_clean() => tracing::warn!(
                "{} filesystem(s) could not be unmounted",
                report.failures.len()
            ),
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping automount teardown: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fstab::FstabTable;
    use crate::orchestrator::Phase;
    use crate::testing::RecordingVfs;

    #[test]
    fn test_initcall_drives_orchestrator() {
        let fstab = FstabTable::from_entries([":/tmp:ramfs", ":/run:ramfs"]).unwrap();
        let mut am = Automount::new(RecordingVfs::new(), None, fstab);
        let call: &mut dyn Initcall = &mut am;

        assert_eq!(call.priority(), ROOTFS_PRIORITY);
        call.init().unwrap();
        call.term();
        call.term();

        assert_eq!(am.phase(), Phase::Unmounted);
        assert_eq!(am.vfs().unmounted_paths(), vec!["/run", "/tmp"]);
    }

    #[test]
    fn test_term_after_failed_init() {
        let fstab = FstabTable::from_entries([":/tmp:ramfs", ":/run:ramfs"]).unwrap();
        let mut am = Automount::new(RecordingVfs::new(), None, fstab);
        am.vfs_mut().fail_mount.insert("/run".to_string());

        assert!(am.init().is_err());
        am.term();

        assert_eq!(am.vfs().unmounted_paths(), vec!["/tmp"]);
    }
}
