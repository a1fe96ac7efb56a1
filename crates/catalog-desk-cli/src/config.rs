use std::fs;
use std::path::{Path, PathBuf};

use catalog_desk_core::CatalogKind;
use catalog_desk_store::{CatalogResource, EditorSettings, GroupAccessPolicy, User};
use serde::Deserialize;

use crate::error::CliError;

pub const DEFAULT_CONFIG_PATH: &str = "catalog-desk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub audit_log_path: String,
    pub comment_log_path: String,
    pub use_edit_logging: bool,
    pub requires_auth: bool,
    pub language_groups: bool,
    pub tool_name: String,
    pub tool_version: String,
    pub catalogs: Vec<CatalogConfig>,
    pub translators: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub language: String,
    #[serde(default = "default_format")]
    pub format: CatalogKind,
}

fn default_format() -> CatalogKind {
    CatalogKind::Gettext
}

impl Default for CliConfig {
    fn default() -> Self {
        let settings = EditorSettings::default();
        Self {
            audit_log_path: "catalog-desk-audit.jsonl".to_string(),
            comment_log_path: "catalog-desk-comments.jsonl".to_string(),
            use_edit_logging: settings.use_edit_logging,
            requires_auth: true,
            language_groups: false,
            tool_name: settings.tool_name,
            tool_version: settings.tool_version,
            catalogs: Vec::new(),
            translators: Vec::new(),
        }
    }
}

impl CliConfig {
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            use_edit_logging: self.use_edit_logging,
            tool_name: self.tool_name.clone(),
            tool_version: self.tool_version.clone(),
        }
    }

    pub fn access_policy(&self) -> GroupAccessPolicy {
        GroupAccessPolicy {
            requires_auth: self.requires_auth,
            language_groups: self.language_groups,
        }
    }

    pub fn resources(&self, config_path: &Path) -> Vec<CatalogResource> {
        self.catalogs
            .iter()
            .map(|catalog| {
                CatalogResource::new(
                    catalog.id,
                    catalog.name.clone(),
                    resolve_path(config_path, &catalog.path),
                    catalog.language.clone(),
                    catalog.format,
                )
            })
            .collect()
    }

    pub fn user(&self, username: &str) -> User {
        self.translators
            .iter()
            .find(|user| user.username == username)
            .cloned()
            .unwrap_or_else(|| User::new(username))
    }
}

pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
        _ => path.to_path_buf(),
    }
}

pub fn load_config(path: &Path) -> Result<CliConfig, CliError> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> Result<CliConfig, CliError> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(CliConfig::default())
    }
}
