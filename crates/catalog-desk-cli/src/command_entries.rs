use std::path::PathBuf;

use catalog_desk_core::{EntryFilter, MessageIdentity, format_occurrences, list_entries};
use catalog_desk_store::EditorError;
use serde::Serialize;
use thiserror::Error;

use crate::error::CliError;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum EntriesCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone)]
pub struct EntriesOptions {
    pub config_path: PathBuf,
    pub catalog_id: u64,
    pub filter: EntryFilter,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub identity: MessageIdentity,
    pub source_text: String,
    pub context: Option<String>,
    pub translation: String,
    pub fuzzy: bool,
    pub occurrences: Vec<String>,
}

pub fn run_entries(options: &EntriesOptions) -> Result<Vec<EntryView>, EntriesCommandError> {
    let workspace = Workspace::open(&options.config_path)?;
    let resource = workspace.resource(options.catalog_id)?;
    let catalog = workspace.editor()?.load(resource)?;
    let entries = list_entries(catalog.as_ref(), options.filter, options.search.as_deref())
        .into_iter()
        .filter(|entry| !entry.obsolete)
        .map(|entry| EntryView {
            identity: entry.identity(),
            source_text: entry.source_text.clone(),
            context: entry.context.clone(),
            translation: entry.translation.clone(),
            fuzzy: entry.fuzzy,
            occurrences: format_occurrences(&entry.occurrences),
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::{EntriesOptions, run_entries};
    use crate::workspace::test_support::fixture_dir;
    use catalog_desk_core::{EntryFilter, MessageIdentity};
    use std::fs;

    fn options(dir: &std::path::Path, filter: EntryFilter, search: Option<&str>) -> EntriesOptions {
        EntriesOptions {
            config_path: dir.join("catalog-desk.toml"),
            catalog_id: 1,
            filter,
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn lists_entries_with_identities() {
        let dir = fixture_dir("entries");
        let entries = run_entries(&options(&dir, EntryFilter::All, None)).expect("entries");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].identity, MessageIdentity::of("Hello {name}", None));
        assert_eq!(
            entries[0].occurrences,
            vec!["app/views.py:1", "app/views.py:2", "... and 1 more !"]
        );

        let fuzzy = run_entries(&options(&dir, EntryFilter::Fuzzy, None)).expect("fuzzy");
        assert_eq!(fuzzy.len(), 1);
        assert_eq!(fuzzy[0].source_text, "Save");

        let found = run_entries(&options(&dir, EntryFilter::All, Some("BONJOUR"))).expect("search");
        assert_eq!(found.len(), 1);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn invalid_catalog_is_reported() {
        let dir = fixture_dir("entries_invalid");
        let mut opts = options(&dir, EntryFilter::All, None);
        opts.catalog_id = 2;
        assert!(run_entries(&opts).is_err());
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
