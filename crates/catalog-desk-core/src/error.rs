use thiserror::Error;

use crate::identity::MessageIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("entry not found: {0}")]
    EntryNotFound(MessageIdentity),
    #[error("unsupported field: {0}")]
    UnsupportedField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: &'static str },
    #[error("invalid message identity: {0}")]
    InvalidIdentity(String),
    #[error("invalid batch: {0}")]
    InvalidBatch(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
