#![forbid(unsafe_code)]

mod access;
mod audit;
mod comments;
mod editor;
mod error;
mod gettext;
mod json_map;
mod metadata;
mod po;
mod reconcile;
mod resource;
mod store;
mod suggest;
mod validate;

pub use access::{AccessPolicy, GroupAccessPolicy, TRANSLATORS_GROUP, User};
pub use audit::{
    AuditError, AuditLog, AuditLogEntry, AuditOrder, AuditOrderField, AuditResult, JsonlAuditLog,
    MemoryAuditLog,
};
pub use comments::{
    CommentError, CommentLog, CommentResult, JsonlCommentLog, MAX_COMMENT_LENGTH,
    MemoryCommentLog, MessageComment,
};
pub use editor::{
    EditorError, EditorResult, EditorService, EditorSettings, FieldError, PostedComment,
    SubmitOutcome,
};
pub use error::{StoreError, StoreResult};
pub use gettext::{GettextCatalog, LAST_TRANSLATOR, REVISION_DATE, TRANSLATED_USING};
pub use json_map::{JsonCatalog, JsonCatalogError};
pub use metadata::{REVISION_DATE_FORMAT, metadata_stamp, metadata_stamp_now, translator_display};
pub use po::{PoDocument, PoExtras, PoHeader, PoParseError, parse_po, render_po};
pub use reconcile::{ReconcileError, reconcile};
pub use resource::{CatalogResource, ResourceRegistry};
pub use store::{CatalogStore, FileCatalogStore, StoredCatalog, write_atomic};
pub use suggest::{Suggester, TranslationServiceError};
pub use validate::{IcuSyntaxValidator, SyntaxError, SyntaxValidator};
