use bootmount_vfs::VfsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomountError {
    #[error("malformed fstab entry: {0}")]
    MalformedEntry(String),

    #[error("mount point is not absolute: {0:?}")]
    InvalidPath(String),

    #[error("'.' or '..' are not supported in mount paths: {0}")]
    UnsafePath(String),

    #[error("failed to create mount point {path}: {cause}")]
    MountPointCreationFailed {
        path: String,
        #[source]
        cause: VfsError,
    },

    #[error("invalid or unsupported archive source: {0:?}")]
    ArchiveSourceNotFound(String),

    #[error("failed to extract {origin} to {path}: {cause}")]
    ExtractionFailed {
        origin: String,
        path: String,
        #[source]
        cause: VfsError,
    },

    #[error("failed to mount {device} ({driver}) at {path}: {cause}")]
    MountFailed {
        device: String,
        driver: String,
        path: String,
        #[source]
        cause: VfsError,
    },

    #[error("failed to unmount {path}: {cause}")]
    UnmountFailed {
        path: String,
        #[source]
        cause: VfsError,
    },

    #[error("invalid automount state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no automount configuration provided")]
    NotFound,

    #[error("fstab holds {count} entries, capacity is {capacity}")]
    FstabOverflow { count: usize, capacity: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
