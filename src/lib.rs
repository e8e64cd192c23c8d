//! # orgnote_core
//!
//! A Rust library for managing a vault of plain-text org outline files, with
//! a SQLite-backed metadata + full-text index kept in lockstep with the
//! directory by an incremental background synchronizer.
//!
//! ## Features
//!
//! - **Vault access**: list, read, write, create, and delete outline files
//!   within an explicitly configured root directory, with atomic writes
//! - **Outline model**: parse heading/tag/priority markup into a nested
//!   forest and serialize it back
//! - **File index**: metadata and FTS5 full-text tables queried for listing
//!   and search
//! - **Incremental synchronization**: a three-way diff (new/updated/deleted)
//!   of the live tree against the index, driven by a periodic scheduler with
//!   on-demand triggers
//! - **Favorites**: a flat-file set of favorited paths
//! - **Quick capture**: append timestamped entries to a fixed inbox file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orgnote_core::repo::NoteRepository;
//! use orgnote_core::worker::{Indexer, SyncScheduler};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), orgnote_core::OrgError> {
//! let repo = NoteRepository::open(Path::new("/path/to/vault")).await?;
//!
//! // Keep the index in sync every 15 minutes, starting now.
//! let scheduler = SyncScheduler::new();
//! let indexer = Indexer::new(repo.vault(), repo.index());
//! scheduler.enqueue_unique_periodic("index", SyncScheduler::DEFAULT_INTERVAL, indexer);
//!
//! // Capture a quick note and search for it once indexed.
//! repo.append_to_inbox("Buy milk")?;
//! scheduler.trigger("index");
//! let hits = repo.list(None, Some("milk")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`vault`]**: the storage-tree capability trait and its local
//!   filesystem implementation
//! - **[`outline`]**: outline parsing, forest building, and serialization
//! - **[`index`]**: the metadata and full-text tables plus search queries
//! - **[`worker`]**: the index synchronizer and its job scheduler
//! - **[`favorites`]**: the flat-file favorites store
//! - **[`repo`]**: the facade composing all of the above
//! - **[`error`]**: unified error handling throughout the library
//!
//! ## Error Handling
//!
//! Operations return [`OrgResult<T>`] wrapping the unified [`OrgError`]
//! type, which converts automatically from sub-module error types so `?`
//! works throughout. Per-file read failures during an index pass are logged
//! and skipped rather than failing the pass; malformed outline markup never
//! errors at all, it degrades to an unstructured preamble.

pub mod error;
pub mod favorites;
pub mod index;
pub mod outline;
pub mod repo;
pub mod vault;
pub mod worker;

/// Re-exports the most commonly used types for convenience.
pub use error::{OrgError, OrgResult};
