use std::cmp::Ordering;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_desk_core::{ChangeRecord, MessageIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::access::User;
use crate::resource::CatalogResource;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("audit log line {line} is malformed: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub created_at: DateTime<Utc>,
    pub sequence: u64,
    pub user: String,
    pub catalog_id: u64,
    pub identity: MessageIdentity,
    pub source_text: String,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl AuditLogEntry {
    fn from_change(
        sequence: u64,
        user: &User,
        resource: &CatalogResource,
        change: &ChangeRecord,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            sequence,
            user: user.username.clone(),
            catalog_id: resource.id,
            identity: change.identity.clone(),
            source_text: change.source_text.clone(),
            field_name: change.field().as_str().to_string(),
            old_value: change.change.from_text(),
            new_value: change.change.to_text(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditOrderField {
    #[default]
    Time,
    User,
    SourceText,
    Identity,
    FieldName,
    OldValue,
    NewValue,
}

impl AuditOrderField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "time" => Some(Self::Time),
            "user" => Some(Self::User),
            "msgid" => Some(Self::SourceText),
            "msghash" => Some(Self::Identity),
            "fieldname" => Some(Self::FieldName),
            "old_value" => Some(Self::OldValue),
            "new_value" => Some(Self::NewValue),
            _ => None,
        }
    }

    fn compare(self, left: &AuditLogEntry, right: &AuditLogEntry) -> Ordering {
        match self {
            Self::Time => left.created_at.cmp(&right.created_at),
            Self::User => left.user.cmp(&right.user),
            Self::SourceText => left.source_text.cmp(&right.source_text),
            Self::Identity => left.identity.as_str().cmp(right.identity.as_str()),
            Self::FieldName => left.field_name.cmp(&right.field_name),
            Self::OldValue => left.old_value.cmp(&right.old_value),
            Self::NewValue => left.new_value.cmp(&right.new_value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditOrder {
    pub field: AuditOrderField,
    pub descending: bool,
}

impl AuditOrder {
    pub fn parse(key: &str) -> Self {
        let (descending, name) = match key.rsplit_once('-') {
            Some((_, name)) => (true, name),
            None => (false, key),
        };
        match AuditOrderField::from_key(name) {
            Some(field) => Self { field, descending },
            None => Self::default(),
        }
    }

    pub fn sort(&self, entries: &mut [AuditLogEntry]) {
        entries.sort_by(|left, right| {
            let ordering = self
                .field
                .compare(left, right)
                .then(left.sequence.cmp(&right.sequence));
            if self.descending { ordering.reverse() } else { ordering }
        });
    }
}

pub trait AuditLog {
    fn record(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        change: &ChangeRecord,
    ) -> AuditResult<AuditLogEntry>;

    fn query(&self, catalog_id: u64, order: AuditOrder) -> AuditResult<Vec<AuditLogEntry>>;
}

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditLogEntry>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        change: &ChangeRecord,
    ) -> AuditResult<AuditLogEntry> {
        let entry = AuditLogEntry::from_change(self.entries.len() as u64, user, resource, change);
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn query(&self, catalog_id: u64, order: AuditOrder) -> AuditResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.catalog_id == catalog_id)
            .cloned()
            .collect();
        order.sort(&mut entries);
        Ok(entries)
    }
}

#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    next_sequence: u64,
}

impl JsonlAuditLog {
    pub fn open(path: impl Into<PathBuf>) -> AuditResult<Self> {
        let path = path.into();
        let next_sequence = read_entries(&path)?
            .iter()
            .map(|entry| entry.sequence + 1)
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

impl AuditLog for JsonlAuditLog {
    fn record(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        change: &ChangeRecord,
    ) -> AuditResult<AuditLogEntry> {
        let entry = AuditLogEntry::from_change(self.next_sequence, user, resource, change);
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let io_error = |source| AuditError::Io {
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
        debug!(sequence = entry.sequence, path = %self.path.display(), "recorded audit entry");
        Ok(entry)
    }

    fn query(&self, catalog_id: u64, order: AuditOrder) -> AuditResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = read_entries(&self.path)?
            .into_iter()
            .filter(|entry| entry.catalog_id == catalog_id)
            .collect();
        order.sort(&mut entries);
        Ok(entries)
    }
}

fn read_entries(path: &Path) -> AuditResult<Vec<AuditLogEntry>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(AuditError::Io {
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
            serde_json::from_str(line).map_err(|source| AuditError::Malformed {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{AuditError, AuditLog, AuditOrder, AuditOrderField, JsonlAuditLog, MemoryAuditLog};
    use crate::access::User;
    use crate::resource::CatalogResource;
    use catalog_desk_core::{CatalogKind, ChangeRecord};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("catalog_desk_audit_{nanos}_{name}"))
    }

    fn resource(id: u64) -> CatalogResource {
        CatalogResource::new(id, "fr", "locale/fr.po", "fr", CatalogKind::Gettext)
    }

    #[test]
    fn parses_order_keys() {
        assert_eq!(
            AuditOrder::parse("-user"),
            AuditOrder {
                field: AuditOrderField::User,
                descending: true
            }
        );
        assert_eq!(AuditOrder::parse("msghash").field, AuditOrderField::Identity);
        assert!(!AuditOrder::parse("msghash").descending);
        assert_eq!(AuditOrder::parse("-nonsense"), AuditOrder::default());
        assert_eq!(AuditOrder::parse(""), AuditOrder::default());
    }

    #[test]
    fn memory_log_records_and_sorts() {
        let mut log = MemoryAuditLog::new();
        let catalog = resource(1);
        log.record(&User::new("bob"), &catalog, &ChangeRecord::translation("b", None, "", "x"))
            .expect("record");
        log.record(&User::new("alice"), &catalog, &ChangeRecord::fuzzy("a", None, true, false))
            .expect("record");
        log.record(&User::new("carol"), &resource(2), &ChangeRecord::translation("c", None, "", "y"))
            .expect("record");
        assert_eq!(log.len(), 3);

        let by_user = log.query(1, AuditOrder::parse("user")).expect("query");
        let users: Vec<&str> = by_user.iter().map(|entry| entry.user.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob"]);

        let newest_first = log.query(1, AuditOrder::parse("-msgid")).expect("query");
        assert_eq!(newest_first[0].source_text, "b");

        let default = log.query(1, AuditOrder::parse("bogus")).expect("query");
        assert_eq!(default[0].user, "bob");
        assert_eq!(default[1].field_name, "fuzzy");
        assert_eq!(default[1].old_value.as_deref(), Some("true"));
        assert_eq!(default[1].new_value.as_deref(), Some("false"));
    }

    #[test]
    fn jsonl_log_persists_across_reopen() {
        let path = temp_path("audit.jsonl");
        let catalog = resource(1);
        {
            let mut log = JsonlAuditLog::open(&path).expect("open");
            log.record(&User::new("ann"), &catalog, &ChangeRecord::translation("a", None, "", "x"))
                .expect("record");
            log.record(&User::new("ann"), &catalog, &ChangeRecord::context("a", None, Some("menu")))
                .expect("record");
        }

        let mut log = JsonlAuditLog::open(&path).expect("reopen");
        let entry = log
            .record(&User::new("ben"), &catalog, &ChangeRecord::translation("b", None, "", "y"))
            .expect("record");
        assert_eq!(entry.sequence, 2);

        let entries = log.query(1, AuditOrder::parse("-time")).expect("query");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].user, "ben");
        let context = entries
            .iter()
            .find(|entry| entry.field_name == "context")
            .expect("context entry");
        assert_eq!(context.old_value, None);
        assert_eq!(context.new_value.as_deref(), Some("menu"));
        assert_eq!(fs::read_to_string(&path).expect("read").lines().count(), 3);
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn malformed_lines_are_reported() {
        let path = temp_path("broken.jsonl");
        fs::write(&path, "{not json}\n").expect("write");
        let err = JsonlAuditLog::open(&path).expect_err("error");
        assert!(matches!(err, AuditError::Malformed { line: 1, .. }));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn unwritable_log_is_an_error() {
        let path = temp_path("missing-dir").join("audit.jsonl");
        let mut log = JsonlAuditLog::open(&path).expect("open");
        let err = log
            .record(&User::new("ann"), &resource(1), &ChangeRecord::translation("a", None, "", "x"))
            .expect_err("error");
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
