use orgnote_core::error::OrgError;
use orgnote_core::index::Index;
use orgnote_core::vault::local::LocalVault;
use orgnote_core::worker::{Indexer, SyncScheduler};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

async fn indexer_for(root: &std::path::Path) -> Result<(Indexer, Index), OrgError> {
    let vault = LocalVault::open(root)?;
    let index = Index::open(&root.join(".index.db")).await?;
    Ok((Indexer::new(Arc::new(vault), index.clone()), index))
}

// The first periodic tick fires immediately, so enqueueing doubles as the
// app-start indexing trigger.
#[tokio::test]
async fn periodic_job_runs_an_immediate_first_pass() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("a.org"), "* Alpha")?;

    let (indexer, index) = indexer_for(root).await?;
    let scheduler = SyncScheduler::new();
    assert!(scheduler.enqueue_unique_periodic("index", Duration::from_secs(600), indexer));

    sleep(Duration::from_millis(500)).await;

    let a_path = root.join("a.org").display().to_string();
    assert!(index.record_for(&a_path).await?.is_some());

    scheduler.shutdown();
    Ok(())
}

#[tokio::test]
async fn duplicate_enqueue_keeps_the_existing_job() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();

    let (indexer, _index) = indexer_for(root).await?;
    let scheduler = SyncScheduler::new();

    assert!(scheduler.enqueue_unique_periodic("index", Duration::from_secs(600), indexer.clone()));
    assert!(!scheduler.enqueue_unique_periodic("index", Duration::from_secs(600), indexer));

    scheduler.shutdown();
    Ok(())
}

#[tokio::test]
async fn on_demand_trigger_runs_a_pass() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();

    let (indexer, index) = indexer_for(root).await?;
    let scheduler = SyncScheduler::new();
    scheduler.enqueue_unique_periodic("index", Duration::from_secs(600), indexer);

    // Let the immediate first pass finish before dropping in a new file.
    sleep(Duration::from_millis(300)).await;
    fs::write(root.join("late.org"), "* Late arrival")?;

    assert!(scheduler.trigger("index"));
    sleep(Duration::from_millis(500)).await;

    let late_path = root.join("late.org").display().to_string();
    assert!(index.record_for(&late_path).await?.is_some());

    scheduler.shutdown();
    Ok(())
}

#[tokio::test]
async fn unknown_job_names_are_rejected() -> Result<(), OrgError> {
    let scheduler = SyncScheduler::new();
    assert!(!scheduler.trigger("nope"));
    assert!(!scheduler.cancel("nope"));
    Ok(())
}

#[tokio::test]
async fn cancelled_job_stops_accepting_triggers() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();

    let (indexer, _index) = indexer_for(root).await?;
    let scheduler = SyncScheduler::new();
    scheduler.enqueue_unique_periodic("index", Duration::from_secs(600), indexer);

    assert!(scheduler.cancel("index"));
    assert!(!scheduler.trigger("index"));

    Ok(())
}
