use catalog_desk_core::{
    Catalog, ChangeRecord, CoreError, MetadataStamp, ReconcileOutcome, apply_changes,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::resource::CatalogResource;
use crate::store::CatalogStore;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Loads `resource` once, applies `changes` against that snapshot and
/// writes the catalog back only when at least one change was applied.
///
/// Any error leaves the backing file exactly as it was.
pub fn reconcile(
    store: &dyn CatalogStore,
    resource: &CatalogResource,
    stamp: &MetadataStamp,
    changes: &[ChangeRecord],
) -> Result<ReconcileOutcome, ReconcileError> {
    let mut catalog = store.load(resource)?;
    let outcome = apply_changes(catalog.as_mut(), changes)?;

    for change in &outcome.applied {
        debug!(
            catalog = resource.id,
            identity = %change.identity,
            field = change.field().as_str(),
            "applied change"
        );
    }
    for rejected in &outcome.rejected {
        warn!(
            catalog = resource.id,
            identity = %rejected.change.identity,
            field = rejected.change.field().as_str(),
            current = rejected.current_value.as_deref().unwrap_or(""),
            "rejected stale change"
        );
    }

    if outcome.has_applied() {
        catalog.update_metadata(stamp);
        store.persist(catalog.as_ref(), resource)?;
        info!(
            catalog = resource.id,
            applied = outcome.applied.len(),
            rejected = outcome.rejected.len(),
            "persisted catalog"
        );
    }
    Ok(outcome)
}
