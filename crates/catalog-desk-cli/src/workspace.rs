use std::path::{Path, PathBuf};

use catalog_desk_store::{
    CatalogResource, CatalogStore, EditorService, FileCatalogStore, IcuSyntaxValidator,
    JsonlAuditLog, JsonlCommentLog, ResourceRegistry, StoreError, User,
};
use tracing::{debug, warn};

use crate::config::{CliConfig, load_config_or_default, resolve_path};
use crate::error::CliError;

#[derive(Debug)]
pub struct Workspace {
    pub config: CliConfig,
    pub config_path: PathBuf,
    registry: ResourceRegistry,
}

impl Workspace {
    pub fn open(config_path: &Path) -> Result<Self, CliError> {
        let config = load_config_or_default(config_path)?;
        let mut registry = ResourceRegistry::new(config.resources(config_path));
        registry.refresh_validity();
        for resource in registry.iter().filter(|resource| !resource.is_valid) {
            warn!(
                catalog = resource.id,
                path = %resource.file_location.display(),
                "catalog file is missing"
            );
        }
        let store = FileCatalogStore::new();
        let unreadable: Vec<u64> = registry
            .iter()
            .filter(|resource| resource.is_valid)
            .filter_map(|resource| match store.load(resource) {
                Err(err @ StoreError::ResourceUnreadable { .. }) => {
                    warn!(catalog = resource.id, error = %err, "catalog file is unreadable");
                    Some(resource.id)
                }
                _ => None,
            })
            .collect();
        for id in unreadable {
            registry.mark_invalid(id);
        }
        debug!(config = %config_path.display(), catalogs = config.catalogs.len(), "loaded config");
        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            registry,
        })
    }

    pub fn resource(&self, id: u64) -> Result<&CatalogResource, CliError> {
        self.registry.get(id).ok_or(CliError::UnknownCatalog(id))
    }

    pub fn user(&self, username: &str) -> User {
        self.config.user(username)
    }

    pub fn audit_log_path(&self) -> PathBuf {
        resolve_path(&self.config_path, &self.config.audit_log_path)
    }

    pub fn comment_log_path(&self) -> PathBuf {
        resolve_path(&self.config_path, &self.config.comment_log_path)
    }

    pub fn editor(&self) -> Result<EditorService, CliError> {
        let audit = JsonlAuditLog::open(self.audit_log_path())?;
        let comments = JsonlCommentLog::open(self.comment_log_path())?;
        Ok(EditorService::new(
            Box::new(FileCatalogStore::new()),
            Box::new(self.config.access_policy()),
            Box::new(audit),
            self.config.editor_settings(),
        )
        .with_comment_log(Box::new(comments))
        .with_syntax_validator(Box::new(IcuSyntaxValidator)))
    }
}
