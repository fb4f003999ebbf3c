//! Record store contract.
//!
//! The core consumes a document store through [`DocumentStore`] and
//! [`StoreTransaction`]. Filters and patches are expressed in a small typed
//! query language ([`Filter`], [`Patch`]) that each backend translates into
//! its native representation. [`InMemoryStore`] is the embedded backend used
//! by tests; the MongoDB backend lives in the infrastructure crate.

pub mod collection;
pub mod index;
pub mod memory;
pub mod query;
pub mod record;
pub mod traits;

#[cfg(test)]
mod tests;

pub use collection::Collection;
pub use index::{catalog, IndexKey, IndexSpec};
pub use memory::InMemoryStore;
pub use query::{Document, Filter, FindOptions, Patch, PatchOp, Sort, SortOrder, UpdateCount};
pub use record::{ensure_id, from_document, to_document, Record, ID_FIELD};
pub use traits::{DocumentStore, StoreTransaction};
