use catalog_desk_core::{
    Catalog, CatalogKind, CatalogStatistics, ChangeField, ChangeRecord, CoreError, EditSubmission,
    FieldChange, MessageIdentity, RejectedChange, build_change_set, check_tokens,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::access::{AccessPolicy, User};
use crate::audit::{AuditError, AuditLog, AuditLogEntry, AuditOrder};
use crate::comments::{CommentError, CommentLog, MemoryCommentLog, MessageComment};
use crate::error::StoreError;
use crate::metadata::metadata_stamp_now;
use crate::reconcile::{ReconcileError, reconcile};
use crate::resource::CatalogResource;
use crate::store::{CatalogStore, StoredCatalog};
use crate::suggest::Suggester;
use crate::validate::SyntaxValidator;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{user} may not translate {language}")]
    PermissionDenied { user: String, language: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Comment(#[from] CommentError),
}

impl From<ReconcileError> for EditorError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Store(err) => EditorError::Store(err),
            ReconcileError::Core(err) => EditorError::Core(err),
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub use_edit_logging: bool,
    pub tool_name: String,
    pub tool_version: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            use_edit_logging: true,
            tool_name: "catalog-desk".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub identity: MessageIdentity,
    pub source_text: String,
    pub field: ChangeField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedComment {
    pub comment: MessageComment,
    pub comment_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub applied: Vec<ChangeRecord>,
    pub rejected: Vec<RejectedChange>,
    pub field_errors: Vec<FieldError>,
}

pub struct EditorService {
    store: Box<dyn CatalogStore>,
    policy: Box<dyn AccessPolicy>,
    audit: Box<dyn AuditLog>,
    comments: Box<dyn CommentLog>,
    suggester: Option<Box<dyn Suggester>>,
    syntax_validator: Option<Box<dyn SyntaxValidator>>,
    settings: EditorSettings,
}

impl EditorService {
    pub fn new(
        store: Box<dyn CatalogStore>,
        policy: Box<dyn AccessPolicy>,
        audit: Box<dyn AuditLog>,
        settings: EditorSettings,
    ) -> Self {
        Self {
            store,
            policy,
            audit,
            comments: Box::new(MemoryCommentLog::new()),
            suggester: None,
            syntax_validator: None,
            settings,
        }
    }

    pub fn with_comment_log(mut self, comments: Box<dyn CommentLog>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_suggester(mut self, suggester: Box<dyn Suggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn with_syntax_validator(mut self, validator: Box<dyn SyntaxValidator>) -> Self {
        self.syntax_validator = Some(validator);
        self
    }

    pub fn audit_log(&self) -> &dyn AuditLog {
        self.audit.as_ref()
    }

    pub fn load(&self, resource: &CatalogResource) -> EditorResult<Box<dyn StoredCatalog>> {
        ensure_valid(resource)?;
        Ok(self.store.load(resource)?)
    }

    pub fn submit(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        rows: &[EditSubmission],
    ) -> EditorResult<SubmitOutcome> {
        let changes = build_change_set(rows);
        self.apply(user, resource, &changes)
    }

    pub fn apply(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        changes: &[ChangeRecord],
    ) -> EditorResult<SubmitOutcome> {
        self.authorize(user, resource)?;
        ensure_valid(resource)?;

        let mut field_errors = Vec::new();
        let mut accepted = Vec::with_capacity(changes.len());
        for change in changes {
            if let FieldChange::Translation { to, .. } = &change.change {
                if let Some(err) =
                    self.validate_translation(resource, &change.identity, &change.source_text, to)
                {
                    field_errors.push(err);
                    continue;
                }
            }
            accepted.push(change.clone());
        }

        let mut outcome = self.reconcile_and_audit(user, resource, &accepted)?;
        outcome.field_errors = field_errors;
        Ok(outcome)
    }

    pub fn refresh_shown_values(
        &self,
        resource: &CatalogResource,
        rows: &mut [EditSubmission],
    ) -> EditorResult<()> {
        let catalog = self.load(resource)?;
        catalog_desk_core::refresh_shown_values(catalog.as_ref(), rows);
        Ok(())
    }

    pub fn statistics(&self, resource: &CatalogResource) -> EditorResult<CatalogStatistics> {
        let catalog = self.load(resource)?;
        Ok(CatalogStatistics::from_catalog(catalog.as_ref()))
    }

    pub fn history(
        &self,
        user: &User,
        resource: &CatalogResource,
        order: AuditOrder,
    ) -> EditorResult<Vec<AuditLogEntry>> {
        self.authorize(user, resource)?;
        Ok(self.audit.query(resource.id, order)?)
    }

    pub fn comment(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        body: &str,
    ) -> EditorResult<PostedComment> {
        self.authorize(user, resource)?;
        let catalog = self.load(resource)?;
        if catalog.find_by_identity(identity).is_none() {
            return Err(CoreError::EntryNotFound(identity.clone()).into());
        }
        let comment = self.comments.add(user, resource, identity, body)?;
        let comment_count = self.comments.count(resource.id, identity)?;
        info!(catalog = resource.id, identity = %identity, user = %user.username, "added comment");
        Ok(PostedComment {
            comment,
            comment_count,
        })
    }

    pub fn comments(
        &self,
        user: &User,
        resource: &CatalogResource,
        identity: Option<&MessageIdentity>,
    ) -> EditorResult<Vec<MessageComment>> {
        self.authorize(user, resource)?;
        Ok(self.comments.list(resource.id, identity)?)
    }

    pub fn suggest(&self, source_text: &str, language_code: &str) -> Option<String> {
        let suggester = self.suggester.as_ref()?;
        match suggester.suggest(source_text, language_code) {
            Ok(suggestion) => Some(suggestion),
            Err(err) => {
                warn!(language = language_code, error = %err, "suggestion failed");
                None
            }
        }
    }

    fn authorize(&self, user: &User, resource: &CatalogResource) -> EditorResult<()> {
        if self
            .policy
            .can_translate_language(user, &resource.language_code)
        {
            Ok(())
        } else {
            Err(EditorError::PermissionDenied {
                user: user.username.clone(),
                language: resource.language_code.clone(),
            })
        }
    }

    fn validate_translation(
        &self,
        resource: &CatalogResource,
        identity: &MessageIdentity,
        source_text: &str,
        translation: &str,
    ) -> Option<FieldError> {
        let field_error = |message: String| FieldError {
            identity: identity.clone(),
            source_text: source_text.to_string(),
            field: ChangeField::Translation,
            message,
        };
        if let Err(err) = check_tokens(source_text, translation) {
            return Some(field_error(err.to_string()));
        }
        if resource.kind == CatalogKind::Json && !translation.is_empty() {
            if let Some(validator) = &self.syntax_validator {
                if let Err(err) = validator.validate(translation) {
                    return Some(field_error(err.to_string()));
                }
            }
        }
        None
    }

    fn reconcile_and_audit(
        &mut self,
        user: &User,
        resource: &CatalogResource,
        changes: &[ChangeRecord],
    ) -> EditorResult<SubmitOutcome> {
        if changes.is_empty() {
            return Ok(SubmitOutcome::default());
        }
        let stamp = metadata_stamp_now(user, &self.settings.tool_name, &self.settings.tool_version);
        let outcome = reconcile(self.store.as_ref(), resource, &stamp, changes)?;

        if self.settings.use_edit_logging {
            for change in &outcome.applied {
                if let Err(err) = self.audit.record(user, resource, change) {
                    error!(
                        catalog = resource.id,
                        identity = %change.identity,
                        error = %err,
                        "failed to record audit entry"
                    );
                }
            }
        }
        if !outcome.rejected.is_empty() {
            info!(
                catalog = resource.id,
                user = %user.username,
                rejected = outcome.rejected.len(),
                "returned stale changes to editor"
            );
        }

        Ok(SubmitOutcome {
            applied: outcome.applied,
            rejected: outcome.rejected,
            field_errors: Vec::new(),
        })
    }
}

fn ensure_valid(resource: &CatalogResource) -> Result<(), StoreError> {
    if resource.is_valid {
        Ok(())
    } else {
        Err(StoreError::InvalidResource(resource.id))
    }
}
