use crate::error::ConfigError;
use crate::fstab::FstabTable;
use crate::root::RootConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BOOTMOUNT_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/bootmount.json";

/// Automount policy, resolved once before anything is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomountConfig {
    /// Root filesystem policy. `None` disables root automounting.
    pub root: Option<RootConfig>,
    /// Raw fstab entries, in mount order.
    pub fstab: Vec<String>,
    /// File holding the first initial ramdisk.
    pub initrd0: Option<PathBuf>,
}

impl AutomountConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Look for a configuration in, in order: `inline` if it holds a JSON
    /// object, the `BOOTMOUNT_CONFIG` environment variable, then the file at
    /// `path`.
    pub fn resolve(inline: Option<&str>, path: &Path) -> Result<Self, ConfigError> {
        if let Some(json) = inline.filter(|s| s.trim_start().starts_with('{')) {
            tracing::debug!("Using inline automount configuration");
            return Self::from_json(json);
        }

        if let Ok(json) = std::env::var(CONFIG_ENV) {
            tracing::debug!("Using automount configuration from {}", CONFIG_ENV);
            return Self::from_json(&json);
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!("Using automount configuration from {:?}", path);
                Self::from_json(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub fn fstab_table(&self) -> Result<FstabTable, ConfigError> {
        FstabTable::from_entries(self.fstab.iter().cloned())
    }
}
