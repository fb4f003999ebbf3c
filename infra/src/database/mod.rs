//! MongoDB implementation of the record store.
//!
//! - `connection` - client construction and the fail-fast ping
//! - `store` - [`MongoStore`], the `DocumentStore` implementation
//! - `transaction` - session-backed `StoreTransaction`
//! - `query` - translation of filters, patches and sorts to BSON
//! - `errors` - driver error classification

pub mod connection;
pub mod errors;
pub mod query;
pub mod store;
pub mod transaction;


pub use connection::connect;
pub use store::MongoStore;
pub use transaction::MongoTransaction;
