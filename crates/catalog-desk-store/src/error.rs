use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read catalog {}: {reason}", path.display())]
    ResourceUnreadable { path: PathBuf, reason: String },
    #[error("cannot write catalog {}: {source}", path.display())]
    ResourceWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {0} is not backed by a readable file")]
    InvalidResource(u64),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::ResourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::ResourceWriteError {
            path: path.into(),
            source,
        }
    }
}
