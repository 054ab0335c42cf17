#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    #[error("path escapes configured root: {0}")]
    PathEscapesRoot(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SMB adapter not configured")]
    NotConfigured,

    #[error("SMB error: {0}")]
    Smb(String),
}

impl VfsError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            VfsError::PathEscapesRoot(_) | VfsError::NotFound(_) => crate::ErrorKind::BadInput,
            VfsError::Io { .. } | VfsError::Smb(_) => crate::ErrorKind::UpstreamUnavailable,
            VfsError::NotConfigured => crate::ErrorKind::NotConfigured,
        }
    }
}
