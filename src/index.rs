//! The relational file index: metadata plus full-text content.
//!
//! Two SQLite tables, kept in lockstep by the synchronizer in
//! [`crate::worker`]: `file_metadata` holds one row per indexed file keyed by
//! path, and the FTS5 table `file_content` holds its full text. The pairing
//! is the central invariant: both rows are always written and deleted
//! together inside one transaction per batch.

pub mod query;
pub mod store;

pub use query::Query;
pub use store::{FileRecord, Index};
