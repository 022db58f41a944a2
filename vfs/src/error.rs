use thiserror::Error;

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("system error: {0}")]
    System(#[from] nix::errno::Errno),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("not mounted: {0}")]
    NotMounted(String),
}

impl VfsError {
    /// Whether the primitive failed only because its target already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            VfsError::System(errno) => *errno == nix::errno::Errno::EEXIST,
            VfsError::Io(e) => e.kind() == std::io::ErrorKind::AlreadyExists,
            _ => false,
        }
    }
}
