use std::path::PathBuf;

use catalog_desk_core::CatalogStatistics;
use catalog_desk_store::EditorError;
use thiserror::Error;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum StatsCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct StatsOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
}

pub fn run_stats(options: &StatsOptions) -> Result<CatalogStatistics, StatsCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    Ok(workspace.editor()?.statistics(resource)?)
}

#[cfg(test)]
mod tests {
    use super::{StatsCommandError, StatsOptions, run_stats};
    use crate::workspace::test_support::fixture_dir;
    use catalog_desk_store::{EditorError, StoreError};
    use std::fs;

    #[test]
    fn reports_statistics() {
        let dir = fixture_dir("stats");
        let stats = run_stats(&StatsOptions {
            config_path: dir.join("catalog-desk.toml"),
            catalog_id: 1,
        })
        .expect("stats");
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.translated_messages, 1);
        assert_eq!(stats.fuzzy_messages, 1);
        assert_eq!(stats.percent_translated, 33);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn missing_catalog_file_is_invalid() {
        let dir = fixture_dir("stats_invalid");
        let err = run_stats(&StatsOptions {
            config_path: dir.join("catalog-desk.toml"),
            catalog_id: 2,
        })
        .expect_err("invalid");
        assert!(matches!(
            err,
            StatsCommandError::Editor(EditorError::Store(StoreError::InvalidResource(2)))
        ));
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
