use std::path::PathBuf;

use catalog_desk_core::{CoreError, MessageIdentity};
use catalog_desk_store::{EditorError, MessageComment};
use serde::Serialize;
use thiserror::Error;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum CommentsCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error("invalid identity: {0}")]
    Identity(#[from] CoreError),
    #[error("--add requires --identity")]
    MissingIdentity,
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct CommentsOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
    pub username: String,
    pub identity: Option<String>,
    pub add: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsReport {
    pub posted: Option<MessageComment>,
    pub comment_count: usize,
    pub comments: Vec<MessageComment>,
}

pub fn run_comments(options: &CommentsOptions) -> Result<CommentsReport, CommentsCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    let user = workspace.user(&options.username);
    let identity = options
        .identity
        .as_deref()
        .map(MessageIdentity::parse)
        .transpose()?;
    let mut editor = workspace.editor()?;

    let posted = match &options.add {
        Some(body) => {
            let identity = identity
                .as_ref()
                .ok_or(CommentsCommandError::MissingIdentity)?;
            Some(editor.comment(&user, resource, identity, body)?.comment)
        }
        None => None,
    };
    let comments = editor.comments(&user, resource, identity.as_ref())?;
    Ok(CommentsReport {
        posted,
        comment_count: comments.len(),
        comments,
    })
}
