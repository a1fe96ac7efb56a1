use serde::Serialize;

use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStatistics {
    pub percent_translated: u32,
    pub total_messages: usize,
    pub translated_messages: usize,
    pub fuzzy_messages: usize,
    pub obsolete_messages: usize,
}

impl CatalogStatistics {
    pub fn from_catalog(catalog: &dyn Catalog) -> Self {
        let entries = catalog.entries();
        let translated = entries.iter().filter(|entry| entry.is_translated()).count();
        let untranslated = entries.iter().filter(|entry| entry.is_untranslated()).count();
        let fuzzy = entries
            .iter()
            .filter(|entry| entry.fuzzy && !entry.obsolete)
            .count();
        let obsolete = entries.iter().filter(|entry| entry.obsolete).count();
        let live = entries.len() - obsolete;
        let percent_translated = if live == 0 {
            100
        } else {
            (translated * 100 / live) as u32
        };
        Self {
            percent_translated,
            total_messages: translated + untranslated,
            translated_messages: translated,
            fuzzy_messages: fuzzy,
            obsolete_messages: obsolete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogStatistics;
    use crate::catalog::testing::VecCatalog;
    use crate::entry::MessageEntry;

    #[test]
    fn counts_entry_states() {
        let mut fuzzy = MessageEntry::new("Open", "Ouvrir");
        fuzzy.fuzzy = true;
        let mut obsolete = MessageEntry::new("Old", "Vieux");
        obsolete.obsolete = true;
        let catalog = VecCatalog::new(vec![
            MessageEntry::new("Hello", "Bonjour"),
            MessageEntry::new("Bye", ""),
            fuzzy,
            obsolete,
        ]);
        let stats = CatalogStatistics::from_catalog(&catalog);
        assert_eq!(stats.translated_messages, 1);
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.fuzzy_messages, 1);
        assert_eq!(stats.obsolete_messages, 1);
        assert_eq!(stats.percent_translated, 33);
    }

    #[test]
    fn percentage_truncates_like_gettext_tools() {
        let catalog = VecCatalog::new(vec![
            MessageEntry::new("Hello", "Bonjour"),
            MessageEntry::new("Bye", "Salut"),
            MessageEntry::new("Open", ""),
        ]);
        assert_eq!(CatalogStatistics::from_catalog(&catalog).percent_translated, 66);
    }

    #[test]
    fn empty_catalog_is_fully_translated() {
        let catalog = VecCatalog::default();
        assert_eq!(CatalogStatistics::from_catalog(&catalog).percent_translated, 100);
    }
}
