#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine a home directory to store settings in")]
    NoHomeDir,
}

impl SettingsError {
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            SettingsError::Read { .. }
            | SettingsError::Write { .. }
            | SettingsError::NoHomeDir => crate::ErrorKind::Internal,
            SettingsError::Parse { .. } => crate::ErrorKind::BadInput,
        }
    }
}
