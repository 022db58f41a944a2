//! The automount table.
//!
//! Entries are filled in by whoever ingests boot parameters, one raw entry
//! per slot. The table is walked in slot order up to the first empty slot.

use crate::dispatch::mount_volume;
use crate::error::{AutomountError, ConfigError};
use crate::sources::ArchiveSources;
use crate::volume::Volume;
use bootmount_vfs::Vfs;

/// Maximum number of volumes in the table.
pub const FSTAB_CAPACITY: usize = 10;

/// Boot parameter name the table is exposed under.
pub const FSTAB_PARAM: &str = "vfs.fstab";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FstabTable {
    slots: [Option<String>; FSTAB_CAPACITY],
}

impl FstabTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table holding `entries` in the leading slots.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.len() > FSTAB_CAPACITY {
            return Err(ConfigError::FstabOverflow {
                count: entries.len(),
                capacity: FSTAB_CAPACITY,
            });
        }

        let mut table = Self::new();
        for (slot, entry) in table.slots.iter_mut().zip(entries) {
            *slot = Some(entry);
        }
        Ok(table)
    }

    /// Store `entry` in slot `index`. Returns the entry back when the index
    /// is past the table's capacity.
    pub fn set(&mut self, index: usize, entry: impl Into<String>) -> Result<(), String> {
        let entry = entry.into();
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(entry);
                Ok(())
            }
            None => Err(entry),
        }
    }

    /// Entries that will be processed, in order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map_while(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }
}

/// Parse and mount every table entry in order. The first entry that fails
/// to parse or mount stops the walk.
pub fn mount_fstab<V: Vfs + ?Sized>(
    vfs: &mut V,
    sources: &ArchiveSources<'_>,
    table: &FstabTable,
) -> Result<(), AutomountError> {
    for entry in table.entries() {
        let volume = Volume::parse(entry)?;

        mount_volume(vfs, sources, &volume).inspect_err(|e| {
            tracing::error!("Failed to mount {}: {}", volume.device(), e);
        })?;
    }

    Ok(())
}
