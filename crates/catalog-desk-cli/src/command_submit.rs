use std::fs;
use std::path::PathBuf;

use catalog_desk_core::EditSubmission;
use catalog_desk_store::{EditorError, SubmitOutcome};
use thiserror::Error;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum SubmitCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
    pub username: String,
    pub rows_path: PathBuf,
}

pub fn run_submit(options: &SubmitOptions) -> Result<SubmitOutcome, SubmitCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    let user = workspace.user(&options.username);
    let rows: Vec<EditSubmission> = serde_json::from_str(&fs::read_to_string(&options.rows_path)?)?;
    let outcome = workspace.editor()?.submit(&user, resource, &rows)?;
    Ok(outcome)
}
