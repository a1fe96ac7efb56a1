use std::path::PathBuf;

use catalog_desk_store::{AuditLogEntry, AuditOrder, EditorError};
use thiserror::Error;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum HistoryCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct HistoryOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
    pub username: String,
    pub order_by: Option<String>,
}

pub fn run_history(options: &HistoryOptions) -> Result<Vec<AuditLogEntry>, HistoryCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    let order = options
        .order_by
        .as_deref()
        .map(AuditOrder::parse)
        .unwrap_or_default();
    let user = workspace.user(&options.username);
    Ok(workspace.editor()?.history(&user, resource, order)?)
}
