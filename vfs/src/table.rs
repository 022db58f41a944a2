/// One entry of the live mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub source: String,
    pub path: String,
    pub driver: String,
    pub flags: u64,
}

impl MountPoint {
    pub fn new(source: &str, path: &str, driver: &str, flags: u64) -> Self {
        Self {
            source: source.to_string(),
            path: path.to_string(),
            driver: driver.to_string(),
            flags,
        }
    }
}

/// Ordered record of active mounts. Appended to on mount, walked backwards
/// on teardown.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    entries: Vec<MountPoint>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mount: MountPoint) {
        self.entries.push(mount);
    }

    /// Remove the most recent mount at `path`.
    pub fn remove(&mut self, path: &str) -> Option<MountPoint> {
        let idx = self.entries.iter().rposition(|m| m.path == path)?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MountPoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
