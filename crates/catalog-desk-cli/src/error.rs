use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("audit log error: {0}")]
    Audit(#[from] catalog_desk_store::AuditError),
    #[error("comment log error: {0}")]
    Comment(#[from] catalog_desk_store::CommentError),
    #[error("no catalog with id {0} in config")]
    UnknownCatalog(u64),
}
