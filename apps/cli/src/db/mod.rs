//! Local key-value persistence.

pub mod error;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
