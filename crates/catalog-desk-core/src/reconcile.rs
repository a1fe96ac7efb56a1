use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::change::{ChangeRecord, FieldChange, RejectedChange};
use crate::entry::MessageEntry;
use crate::identity::MessageIdentity;
use crate::newlines::{fix_newlines, translations_match};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub applied: Vec<ChangeRecord>,
    pub rejected: Vec<RejectedChange>,
}

impl ReconcileOutcome {
    pub fn has_applied(&self) -> bool {
        !self.applied.is_empty()
    }
}

struct Located {
    position: usize,
    snapshot: MessageEntry,
}

/// Applies `changes` in order to an already loaded catalog.
///
/// Every precondition is checked against the entries as they were when this
/// call started, not as earlier changes in the batch left them. Identities
/// are resolved before anything is mutated, so an unknown identity leaves
/// the catalog untouched. Changes whose `from` equals `to` are skipped.
pub fn apply_changes(
    catalog: &mut dyn Catalog,
    changes: &[ChangeRecord],
) -> CoreResult<ReconcileOutcome> {
    let mut located: HashMap<&MessageIdentity, Located> = HashMap::new();
    for change in changes {
        if located.contains_key(&change.identity) {
            continue;
        }
        let position = catalog
            .position_of(&change.identity)
            .ok_or_else(|| CoreError::EntryNotFound(change.identity.clone()))?;
        let snapshot = catalog.entries()[position].clone();
        located.insert(&change.identity, Located { position, snapshot });
    }

    let mut outcome = ReconcileOutcome::default();
    for change in changes {
        if change.change.is_noop() {
            continue;
        }
        let Some(Located { position, snapshot }) = located.get(&change.identity) else {
            return Err(CoreError::EntryNotFound(change.identity.clone()));
        };
        let position = *position;
        match &change.change {
            FieldChange::Translation { from, to } => {
                if translations_match(&snapshot.translation, from) {
                    catalog.set_translation(position, fix_newlines(&snapshot.source_text, to));
                    outcome.applied.push(change.clone());
                } else {
                    outcome.rejected.push(RejectedChange {
                        change: change.clone(),
                        current_value: Some(snapshot.translation.clone()),
                    });
                }
            }
            FieldChange::Fuzzy { to, .. } => {
                catalog.set_fuzzy(position, *to);
                outcome.applied.push(change.clone());
            }
            FieldChange::Context { from, to } => {
                if snapshot.context.is_none() || snapshot.context == *from {
                    catalog.set_context(position, to.clone());
                    outcome.applied.push(change.clone());
                } else {
                    outcome.rejected.push(RejectedChange {
                        change: change.clone(),
                        current_value: snapshot.context.clone(),
                    });
                }
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::apply_changes;
    use crate::catalog::Catalog;
    use crate::catalog::testing::VecCatalog;
    use crate::change::ChangeRecord;
    use crate::entry::MessageEntry;
    use crate::identity::MessageIdentity;
    use crate::CoreError;

    fn catalog() -> VecCatalog {
        VecCatalog::new(vec![
            MessageEntry::new("Hello", "A"),
            MessageEntry::new("\nIntro\n", ""),
            MessageEntry::new("File", "Fichier").with_context("menu"),
            MessageEntry::new("Save", "Enregistrer"),
        ])
    }

    #[test]
    fn applies_matching_translation() {
        let mut catalog = catalog();
        let outcome = apply_changes(&mut catalog, &[ChangeRecord::translation("Hello", None, "A", "B")])
            .expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(catalog.entries()[0].translation, "B");
    }

    #[test]
    fn rejects_stale_translation_with_live_value() {
        let mut catalog = catalog();
        let outcome = apply_changes(&mut catalog, &[ChangeRecord::translation("Hello", None, "Z", "B")])
            .expect("apply");
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].current_value.as_deref(), Some("A"));
        assert_eq!(catalog.entries()[0].translation, "A");
    }

    #[test]
    fn same_batch_changes_check_against_load_snapshot() {
        let mut catalog = catalog();
        let outcome = apply_changes(
            &mut catalog,
            &[
                ChangeRecord::translation("Hello", None, "A", "B"),
                ChangeRecord::translation("Hello", None, "A", "C"),
            ],
        )
        .expect("apply");
        assert_eq!(outcome.applied.len(), 2);
        assert!(outcome.rejected.is_empty());
        assert_eq!(catalog.entries()[0].translation, "C");
    }

    #[test]
    fn realigns_newlines_with_source() {
        let mut catalog = catalog();
        apply_changes(&mut catalog, &[ChangeRecord::translation("\nIntro\n", None, "", "Einleitung")])
            .expect("apply");
        assert_eq!(catalog.entries()[1].translation, "\nEinleitung\n");
    }

    #[test]
    fn tolerates_carriage_returns_in_expected_value() {
        let mut catalog = VecCatalog::new(vec![MessageEntry::new("a\nb", "x\ny")]);
        let outcome =
            apply_changes(&mut catalog, &[ChangeRecord::translation("a\nb", None, "x\r\ny", "p\nq")])
                .expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(catalog.entries()[0].translation, "p\nq");
    }

    #[test]
    fn fuzzy_changes_always_apply() {
        let mut catalog = catalog();
        let outcome = apply_changes(&mut catalog, &[ChangeRecord::fuzzy("Save", None, true, true)])
            .expect("apply");
        assert!(outcome.applied.is_empty());

        let outcome = apply_changes(&mut catalog, &[ChangeRecord::fuzzy("Save", None, false, true)])
            .expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert!(catalog.entries()[3].fuzzy);

        let outcome = apply_changes(&mut catalog, &[ChangeRecord::fuzzy("Save", None, false, true)])
            .expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn context_change_checks_live_context() {
        let mut catalog = catalog();
        let stale = ChangeRecord::new(
            MessageIdentity::of("File", Some("menu")),
            "File",
            crate::change::FieldChange::Context {
                from: Some("toolbar".to_string()),
                to: Some("sidebar".to_string()),
            },
        );
        let outcome = apply_changes(&mut catalog, &[stale]).expect("apply");
        assert_eq!(outcome.rejected[0].current_value.as_deref(), Some("menu"));

        let fresh = ChangeRecord::context("File", Some("menu"), Some("sidebar"));
        let outcome = apply_changes(&mut catalog, &[fresh]).expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(catalog.entries()[2].context.as_deref(), Some("sidebar"));
    }

    #[test]
    fn unset_live_context_accepts_any_expected_value() {
        let mut catalog = catalog();
        let change = ChangeRecord::new(
            MessageIdentity::of("Save", None),
            "Save",
            crate::change::FieldChange::Context {
                from: Some("whatever".to_string()),
                to: Some("dialog".to_string()),
            },
        );
        let outcome = apply_changes(&mut catalog, &[change]).expect("apply");
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(catalog.entries()[3].context.as_deref(), Some("dialog"));
    }

    #[test]
    fn unknown_identity_aborts_without_mutation() {
        let mut catalog = catalog();
        let err = apply_changes(
            &mut catalog,
            &[
                ChangeRecord::translation("Hello", None, "A", "B"),
                ChangeRecord::translation("Gone", None, "", "x"),
            ],
        )
        .expect_err("missing");
        assert!(matches!(err, CoreError::EntryNotFound(_)));
        assert_eq!(catalog.entries()[0].translation, "A");
    }

    #[test]
    fn context_edit_does_not_break_later_changes_to_same_entry() {
        let mut catalog = catalog();
        let outcome = apply_changes(
            &mut catalog,
            &[
                ChangeRecord::context("File", Some("menu"), Some("sidebar")),
                ChangeRecord::translation("File", Some("menu"), "Fichier", "Document"),
            ],
        )
        .expect("apply");
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(catalog.entries()[2].translation, "Document");
    }
}
