//! Background index maintenance: the synchronizer and its scheduler.

pub mod indexer;
pub mod scheduler;

pub use indexer::{Indexer, SyncReport};
pub use scheduler::SyncScheduler;
