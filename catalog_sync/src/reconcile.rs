//! Set reconciliation between a persisted snapshot and a fresh collection

use crate::store::SnapshotStore;
use market_common::{CatalogError, NameSet, Result, Slot};

/// Names present both in `slot` and in `fresh`, sorted ascending.
///
/// Fails with `MissingSnapshot` if the slot was never written or cannot be read.
pub fn intersect<S, I, T>(store: &S, slot: &Slot, fresh: I) -> Result<Vec<String>>
where
    S: SnapshotStore + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let reference = load_reference(store, slot)?;
    let candidates: NameSet = fresh
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    let common: Vec<String> = reference.intersection(&candidates).cloned().collect();
    log::debug!(
        "Reconciled {} candidates against {} ({} names): {} in common",
        candidates.len(),
        slot,
        reference.len(),
        common.len()
    );
    Ok(common)
}

fn load_reference<S: SnapshotStore + ?Sized>(store: &S, slot: &Slot) -> Result<NameSet> {
    match store.get(slot) {
        Ok(Some(names)) => Ok(names),
        Ok(None) => Err(CatalogError::MissingSnapshot {
            slot: slot.name(),
        }),
        Err(e) => {
            log::warn!("Failed to read snapshot {}: {}", slot, e);
            Err(CatalogError::MissingSnapshot {
                slot: slot.name(),
            })
        }
    }
}
