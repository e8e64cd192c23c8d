use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::OrgError;
use crate::index::store::{FileRecord, Index};
use crate::vault::{EntryInfo, FileVault};

/// Reconciles the live storage tree against the index tables.
///
/// One [`synchronize`](Indexer::synchronize) pass is a three-way diff of the
/// directory snapshot against the indexed path set: new and changed files are
/// re-read and upserted, vanished files are deleted, and untouched files cost
/// no I/O at all. Concurrent passes are not excluded here; at-most-one
/// inflight is the scheduler's job, and the idempotent upserts mask most
/// overlaps anyway.
#[derive(Clone)]
pub struct Indexer {
    vault: Arc<dyn FileVault>,
    index: Index,
}

/// What one synchronization pass changed.
///
/// A pass over an unchanged tree reports all zeros.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Files whose content could not be read this pass.
    pub skipped: usize,
}

impl Indexer {
    pub fn new(vault: Arc<dyn FileVault>, index: Index) -> Self {
        Self { vault, index }
    }

    /// Runs one synchronization pass.
    ///
    /// A file that cannot be read is logged and skipped; the rest of the pass
    /// proceeds. A failure enumerating the tree or committing a batch aborts
    /// the pass and propagates; whatever earlier batches committed persists
    /// until the next pass reconciles it.
    pub async fn synchronize(&self) -> Result<SyncReport, OrgError> {
        let snapshot = self.vault.snapshot()?;
        debug!(files = snapshot.len(), "starting index pass");

        let indexed: HashMap<String, FileRecord> = self
            .index
            .all_records()
            .await?
            .into_iter()
            .map(|record| (record.path.clone(), record))
            .collect();

        let live_paths: HashSet<String> = snapshot
            .iter()
            .map(|entry| entry.path.display().to_string())
            .collect();

        let mut report = SyncReport::default();
        let mut upserts: Vec<(FileRecord, String)> = Vec::new();

        for entry in &snapshot {
            let path = entry.path.display().to_string();
            match indexed.get(&path) {
                None => {
                    if let Some(pair) = self.load(entry, &mut report) {
                        upserts.push(pair);
                        report.added += 1;
                    }
                }
                Some(record)
                    if record.last_modified != entry.last_modified
                        || record.size != entry.size as i64 =>
                {
                    if let Some(pair) = self.load(entry, &mut report) {
                        upserts.push(pair);
                        report.updated += 1;
                    }
                }
                Some(_) => {}
            }
        }

        let deleted: Vec<String> = indexed
            .keys()
            .filter(|path| !live_paths.contains(*path))
            .cloned()
            .collect();
        report.removed = deleted.len();

        self.index.upsert_batch(&upserts).await?;
        self.index.delete_batch(&deleted).await?;

        debug!(
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            skipped = report.skipped,
            "index pass finished"
        );
        Ok(report)
    }

    /// Reads a file's content and builds its record pair, or counts it as
    /// skipped when the read fails.
    fn load(&self, entry: &EntryInfo, report: &mut SyncReport) -> Option<(FileRecord, String)> {
        match self.vault.read_text(&entry.path) {
            Ok(content) => Some((
                FileRecord {
                    path: entry.path.display().to_string(),
                    file_name: entry.name.clone(),
                    last_modified: entry.last_modified,
                    size: entry.size as i64,
                },
                content,
            )),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "skipping unreadable file");
                report.skipped += 1;
                None
            }
        }
    }
}
