//! Archive origins for the extraction code path.

use crate::error::AutomountError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The first initial ramdisk handed over by the boot loader.
pub const INITRD0: &str = "initrd0";

/// An archive linked into the image at build time.
pub const EMBEDDED: &str = "embedded";

/// Where an initial ramdisk root is populated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitrdOrigin {
    Initrd0,
    Embedded,
}

impl InitrdOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitrdOrigin::Initrd0 => INITRD0,
            InitrdOrigin::Embedded => EMBEDDED,
        }
    }
}

impl fmt::Display for InitrdOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory regions that archives can be extracted from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveSources<'a> {
    initrd0: Option<&'a [u8]>,
    embedded: Option<&'a [u8]>,
}

impl<'a> ArchiveSources<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initrd0(mut self, data: &'a [u8]) -> Self {
        self.initrd0 = Some(data);
        self
    }

    /// Register the build-embedded archive, typically an `include_bytes!`
    /// region of the embedding binary.
    pub fn with_embedded(mut self, data: &'a [u8]) -> Self {
        self.embedded = Some(data);
        self
    }

    /// Resolve a named origin to its archive bytes.
    pub fn resolve(&self, origin: &str) -> Result<&'a [u8], AutomountError> {
        let region = match origin {
            INITRD0 => self.initrd0.ok_or_else(|| {
                tracing::error!("Could not find an initrd!");
                AutomountError::ArchiveSourceNotFound(origin.to_string())
            })?,
            EMBEDDED => self.embedded.ok_or_else(|| {
                tracing::error!("No embedded initrd is linked in");
                AutomountError::ArchiveSourceNotFound(origin.to_string())
            })?,
            _ => {
                tracing::error!("{:?} is an invalid or unsupported initrd source!", origin);
                return Err(AutomountError::ArchiveSourceNotFound(origin.to_string()));
            }
        };

        if region.is_empty() {
            tracing::warn!("Initrd {:?} seems to be empty.", origin);
        }

        Ok(region)
    }
}
