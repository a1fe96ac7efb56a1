use serde::{Deserialize, Serialize};

use crate::entry::MessageEntry;
use crate::identity::MessageIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Gettext,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataStamp {
    pub last_translator: String,
    pub translated_using: String,
    pub revision_date: String,
}

/// In-memory catalog loaded from one backing resource.
///
/// Entries are addressed by position for mutation because an entry's
/// identity changes when its context is edited. Formats that lack fuzzy
/// markers, contexts or header metadata treat those mutations as no-ops.
pub trait Catalog {
    fn kind(&self) -> CatalogKind;

    fn entries(&self) -> &[MessageEntry];

    fn set_translation(&mut self, position: usize, translation: String);

    fn set_fuzzy(&mut self, position: usize, fuzzy: bool);

    fn set_context(&mut self, position: usize, context: Option<String>);

    fn update_metadata(&mut self, stamp: &MetadataStamp);

    fn metadata(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn position_of(&self, identity: &MessageIdentity) -> Option<usize> {
        self.entries()
            .iter()
            .position(|entry| !entry.obsolete && &entry.identity() == identity)
    }

    fn find_by_identity(&self, identity: &MessageIdentity) -> Option<&MessageEntry> {
        self.position_of(identity)
            .and_then(|position| self.entries().get(position))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Catalog, CatalogKind, MetadataStamp};
    use crate::entry::MessageEntry;

    #[derive(Debug, Default)]
    pub struct VecCatalog {
        pub entries: Vec<MessageEntry>,
        pub stamp: Option<MetadataStamp>,
    }

    impl VecCatalog {
        pub fn new(entries: Vec<MessageEntry>) -> Self {
            Self {
                entries,
                stamp: None,
            }
        }
    }

    impl Catalog for VecCatalog {
        fn kind(&self) -> CatalogKind {
            CatalogKind::Gettext
        }

        fn entries(&self) -> &[MessageEntry] {
            &self.entries
        }

        fn set_translation(&mut self, position: usize, translation: String) {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.translation = translation;
            }
        }

        fn set_fuzzy(&mut self, position: usize, fuzzy: bool) {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.fuzzy = fuzzy;
            }
        }

        fn set_context(&mut self, position: usize, context: Option<String>) {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.context = context;
            }
        }

        fn update_metadata(&mut self, stamp: &MetadataStamp) {
            self.stamp = Some(stamp.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use super::testing::VecCatalog;
    use crate::entry::MessageEntry;
    use crate::identity::MessageIdentity;

    #[test]
    fn finds_entries_by_identity() {
        let catalog = VecCatalog::new(vec![
            MessageEntry::new("File", "Fichier").with_context("menu"),
            MessageEntry::new("File", "Dossier").with_context("toolbar"),
        ]);
        let entry = catalog
            .find_by_identity(&MessageIdentity::of("File", Some("toolbar")))
            .expect("entry");
        assert_eq!(entry.translation, "Dossier");
        assert!(catalog.find_by_identity(&MessageIdentity::of("File", None)).is_none());
    }

    #[test]
    fn obsolete_entries_are_not_edit_targets() {
        let mut obsolete = MessageEntry::new("Old", "Vieux");
        obsolete.obsolete = true;
        let catalog = VecCatalog::new(vec![obsolete]);
        assert!(catalog.find_by_identity(&MessageIdentity::of("Old", None)).is_none());
        assert_eq!(catalog.entries().len(), 1);
    }
}
