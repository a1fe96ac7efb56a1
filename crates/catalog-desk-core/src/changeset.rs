use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::change::{ChangeRecord, FieldChange};
use crate::identity::MessageIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSubmission {
    #[serde(alias = "md5hash")]
    pub identity: MessageIdentity,
    #[serde(alias = "msgid")]
    pub source_text: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub old_translation: String,
    #[serde(default)]
    pub fuzzy: bool,
    #[serde(default)]
    pub old_fuzzy: bool,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub old_context: Option<String>,
}

impl EditSubmission {
    pub fn is_updated(&self) -> bool {
        self.translation != self.old_translation
            || self.fuzzy != self.old_fuzzy
            || self.context != self.old_context
    }

    pub fn changes(&self) -> Vec<ChangeRecord> {
        let mut changes = Vec::new();
        if self.translation != self.old_translation {
            changes.push(self.record(FieldChange::Translation {
                from: self.old_translation.clone(),
                to: self.translation.clone(),
            }));
        }
        if self.fuzzy != self.old_fuzzy {
            changes.push(self.record(FieldChange::Fuzzy {
                from: self.old_fuzzy,
                to: self.fuzzy,
            }));
        }
        if self.context != self.old_context {
            changes.push(self.record(FieldChange::Context {
                from: self.old_context.clone(),
                to: self.context.clone(),
            }));
        }
        changes
    }

    fn record(&self, change: FieldChange) -> ChangeRecord {
        ChangeRecord::new(self.identity.clone(), self.source_text.clone(), change)
    }
}

pub fn build_change_set(rows: &[EditSubmission]) -> Vec<ChangeRecord> {
    rows.iter()
        .filter(|row| row.is_updated())
        .flat_map(EditSubmission::changes)
        .collect()
}

pub fn refresh_shown_values(catalog: &dyn Catalog, rows: &mut [EditSubmission]) {
    for row in rows.iter_mut() {
        if let Some(entry) = catalog.find_by_identity(&row.identity) {
            row.old_translation = entry.translation.clone();
            row.old_fuzzy = entry.fuzzy;
            row.old_context = entry.context.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSubmission, build_change_set, refresh_shown_values};
    use crate::catalog::testing::VecCatalog;
    use crate::change::{ChangeField, FieldChange};
    use crate::entry::MessageEntry;
    use crate::identity::MessageIdentity;

    fn row(source: &str, shown: &str, posted: &str) -> EditSubmission {
        EditSubmission {
            identity: MessageIdentity::of(source, None),
            source_text: source.to_string(),
            translation: posted.to_string(),
            old_translation: shown.to_string(),
            fuzzy: false,
            old_fuzzy: false,
            context: None,
            old_context: None,
        }
    }

    #[test]
    fn unchanged_rows_produce_no_records() {
        let rows = vec![row("Hello", "Bonjour", "Bonjour")];
        assert!(build_change_set(&rows).is_empty());
    }

    #[test]
    fn emits_one_record_per_changed_field() {
        let mut edited = row("Hello", "", "Bonjour");
        edited.fuzzy = true;
        let rows = vec![row("Bye", "Salut", "Salut"), edited];
        let changes = build_change_set(&rows);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field(), ChangeField::Translation);
        assert_eq!(changes[1].change, FieldChange::Fuzzy { from: false, to: true });
        assert_eq!(changes[1].source_text, "Hello");
    }

    #[test]
    fn refreshes_shown_values_from_live_catalog() {
        let mut live = MessageEntry::new("Hello", "Salut");
        live.fuzzy = true;
        let catalog = VecCatalog::new(vec![live]);
        let mut rows = vec![row("Hello", "Bonjour", "Coucou"), row("Gone", "x", "y")];
        refresh_shown_values(&catalog, &mut rows);
        assert_eq!(rows[0].old_translation, "Salut");
        assert!(rows[0].old_fuzzy);
        assert_eq!(rows[0].translation, "Coucou");
        assert_eq!(rows[1].old_translation, "x");
    }

    #[test]
    fn decodes_posted_rows() {
        let identity = MessageIdentity::of("Hello", None);
        let input = format!(
            r#"[{{"md5hash": "{identity}", "msgid": "Hello", "translation": "Bonjour", "old_translation": ""}}]"#
        );
        let rows: Vec<EditSubmission> = serde_json::from_str(&input).expect("rows");
        assert_eq!(rows[0].identity, identity);
        assert!(!rows[0].fuzzy);
        assert_eq!(build_change_set(&rows).len(), 1);
    }
}
