use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("corrupt file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the file the failure is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path } | Self::Corrupt { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
