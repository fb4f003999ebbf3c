//! Creation of the marketplace index catalogue.

use estate_core::errors::StoreResult;
use estate_core::store::{catalog, DocumentStore};

/// Create every catalogue index; returns how many specifications were
/// applied. Existing identical indexes are left in place.
pub async fn ensure_indexes(store: &dyn DocumentStore) -> StoreResult<usize> {
    let specs = catalog();
    for spec in &specs {
        store.create_index(spec).await?;
    }

    tracing::info!(count = specs.len(), event = "indexes_ensured", "Index catalogue applied");
    Ok(specs.len())
}

/// Every collection with its document count, sorted by name
pub async fn collection_counts(store: &dyn DocumentStore) -> StoreResult<Vec<(String, u64)>> {
    let mut counts = Vec::new();
    for name in store.list_collections().await? {
        let count = store.count(&name, &estate_core::Filter::All).await?;
        counts.push((name, count));
    }
    Ok(counts)
}
