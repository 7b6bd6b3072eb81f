// SQLite record store plus a path-addressed blob store.
// The record store owns opportunities, companies and attachment metadata;
// attachment bytes live in the blob store.

mod blob;
mod changes;
mod db;
mod error;
mod queries;
mod records;
mod schema;

// Public API
pub use blob::{BlobStore, FsBlobStore};
pub use changes::{ChangeEvent, ChangeFeed, ChangeKind, Table};
pub use db::{Database, OpportunityQuery};
pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
