use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_desk_core::MessageIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::access::User;
use crate::resource::CatalogResource;

pub const MAX_COMMENT_LENGTH: usize = 1024;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("comment body is empty")]
    EmptyBody,
    #[error("comment body is {length} characters, limit is {}", MAX_COMMENT_LENGTH)]
    BodyTooLong { length: usize },
    #[error("comment log io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("comment log line {line} is malformed: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CommentResult<T> = Result<T, CommentError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageComment {
    pub created_at: DateTime<Utc>,
    pub sequence: u64,
    pub user: String,
    pub catalog_id: u64,
    pub identity: MessageIdentity,
    pub body: String,
}

impl MessageComment {
    fn new(
        sequence: u64,
        user: &User,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        body: &str,
    ) -> CommentResult<Self> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CommentError::EmptyBody);
        }
        let length = body.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(CommentError::BodyTooLong { length });
        }
        Ok(Self {
            created_at: Utc::now(),
            sequence,
            user: user.username.clone(),
            catalog_id: resource.id,
            identity: identity.clone(),
            body: body.to_string(),
        })
    }

    fn is_about(&self, catalog_id: u64, identity: Option<&MessageIdentity>) -> bool {
        self.catalog_id == catalog_id && identity.is_none_or(|identity| &self.identity == identity)
    }
}

pub trait CommentLog {
    fn add(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        body: &str,
    ) -> CommentResult<MessageComment>;

    fn list(
        &self,
        catalog_id: u64,
        identity: Option<&MessageIdentity>,
    ) -> CommentResult<Vec<MessageComment>>;

    fn count(&self, catalog_id: u64, identity: &MessageIdentity) -> CommentResult<usize> {
        Ok(self.list(catalog_id, Some(identity))?.len())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCommentLog {
    comments: Vec<MessageComment>,
}

impl MemoryCommentLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentLog for MemoryCommentLog {
    fn add(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        body: &str,
    ) -> CommentResult<MessageComment> {
        let comment =
            MessageComment::new(self.comments.len() as u64, user, resource, identity, body)?;
        self.comments.push(comment.clone());
        Ok(comment)
    }

    fn list(
        &self,
        catalog_id: u64,
        identity: Option<&MessageIdentity>,
    ) -> CommentResult<Vec<MessageComment>> {
        Ok(self
            .comments
            .iter()
            .filter(|comment| comment.is_about(catalog_id, identity))
            .cloned()
            .collect())
    }
}

#[derive(Debug)]
pub struct JsonlCommentLog {
    path: PathBuf,
    next_sequence: u64,
}

impl JsonlCommentLog {
    pub fn open(path: impl Into<PathBuf>) -> CommentResult<Self> {
        let path = path.into();
        let next_sequence = read_comments(&path)?
            .iter()
            .map(|comment| comment.sequence + 1)
            .max()
            .unwrap_or(0);
        Ok(Self {
            path,
            next_sequence,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommentLog for JsonlCommentLog {
    fn add(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        body: &str,
    ) -> CommentResult<MessageComment> {
        let comment = MessageComment::new(self.next_sequence, user, resource, identity, body)?;
        let mut line = serde_json::to_string(&comment)?;
        line.push('\n');
        let io_error = |source| CommentError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        file.write_all(line.as_bytes()).map_err(io_error)?;
        self.next_sequence += 1;
        debug!(sequence = comment.sequence, path = %self.path.display(), "recorded comment");
        Ok(comment)
    }

    fn list(
        &self,
        catalog_id: u64,
        identity: Option<&MessageIdentity>,
    ) -> CommentResult<Vec<MessageComment>> {
        let mut comments: Vec<MessageComment> = read_comments(&self.path)?
            .into_iter()
            .filter(|comment| comment.is_about(catalog_id, identity))
            .collect();
        comments.sort_by_key(|comment| comment.sequence);
        Ok(comments)
    }
}

fn read_comments(path: &Path) -> CommentResult<Vec<MessageComment>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CommentError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| CommentError::Malformed {
                line: idx + 1,
                source,
            })
        })
        .collect()
}
