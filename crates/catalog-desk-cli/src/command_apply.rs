use std::fs;
use std::path::PathBuf;

use catalog_desk_core::{CoreError, decode_batch};
use catalog_desk_store::{EditorError, SubmitOutcome};
use thiserror::Error;
use tracing::info;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum ApplyCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid change batch: {0}")]
    Batch(#[from] CoreError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
    pub username: String,
    pub changes_path: PathBuf,
}

pub fn run_apply(options: &ApplyOptions) -> Result<SubmitOutcome, ApplyCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    let user = workspace.user(&options.username);
    let changes = decode_batch(&fs::read_to_string(&options.changes_path)?)?;
    info!(catalog = resource.id, changes = changes.len(), user = %user.username, "applying batch");
    let outcome = workspace.editor()?.apply(&user, resource, &changes)?;
    Ok(outcome)
}
