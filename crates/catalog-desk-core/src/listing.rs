use core::str::FromStr;

use regex::RegexBuilder;

use crate::catalog::Catalog;
use crate::entry::MessageEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    All,
    Translated,
    Untranslated,
    Fuzzy,
}

impl EntryFilter {
    fn matches(self, entry: &MessageEntry) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::Translated => entry.is_translated(),
            EntryFilter::Untranslated => entry.is_untranslated(),
            EntryFilter::Fuzzy => entry.fuzzy && !entry.obsolete,
        }
    }
}

impl FromStr for EntryFilter {
    type Err = core::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "translated" => EntryFilter::Translated,
            "untranslated" => EntryFilter::Untranslated,
            "fuzzy" => EntryFilter::Fuzzy,
            _ => EntryFilter::All,
        })
    }
}

pub fn list_entries<'a>(
    catalog: &'a dyn Catalog,
    filter: EntryFilter,
    search: Option<&str>,
) -> Vec<&'a MessageEntry> {
    let pattern = match search {
        Some(term) => match RegexBuilder::new(term).case_insensitive(true).build() {
            Ok(pattern) => Some(pattern),
            Err(_) => return Vec::new(),
        },
        None => None,
    };
    catalog
        .entries()
        .iter()
        .filter(|entry| filter.matches(entry))
        .filter(|entry| match &pattern {
            Some(pattern) => {
                pattern.is_match(&entry.source_text)
                    || pattern.is_match(&entry.translation)
                    || entry
                        .context
                        .as_deref()
                        .is_some_and(|context| pattern.is_match(context))
            }
            None => true,
        })
        .collect()
}

pub fn format_occurrences(occurrences: &[String]) -> Vec<String> {
    let mut shown: Vec<String> = occurrences.iter().take(2).cloned().collect();
    if occurrences.len() > 2 {
        shown.push(format!("... and {} more !", occurrences.len() - 2));
    }
    shown
}
