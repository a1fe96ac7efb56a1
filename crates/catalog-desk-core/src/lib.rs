#![forbid(unsafe_code)]

mod catalog;
mod change;
mod changeset;
mod entry;
mod error;
mod identity;
mod listing;
mod newlines;
mod reconcile;
mod stats;
mod tokens;

pub use catalog::{Catalog, CatalogKind, MetadataStamp};
pub use change::{ChangeField, ChangeRecord, FieldChange, RejectedChange, WireChange, decode_batch};
pub use changeset::{EditSubmission, build_change_set, refresh_shown_values};
pub use entry::MessageEntry;
pub use error::{CoreError, CoreResult};
pub use identity::MessageIdentity;
pub use listing::{EntryFilter, format_occurrences, list_entries};
pub use newlines::{fix_newlines, translations_match};
pub use reconcile::{ReconcileOutcome, apply_changes};
pub use stats::CatalogStatistics;
pub use tokens::{ValidationError, check_tokens, extract_tokens};
