use orgnote_core::error::OrgError;
use orgnote_core::index::Index;
use orgnote_core::vault::local::LocalVault;
use orgnote_core::vault::FileVault;
use orgnote_core::worker::{Indexer, SyncReport};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

async fn indexer_for(root: &std::path::Path) -> Result<(Indexer, Index), OrgError> {
    let vault = LocalVault::open(root)?;
    let index = Index::open(&root.join(".index.db")).await?;
    Ok((Indexer::new(Arc::new(vault), index.clone()), index))
}

#[tokio::test]
async fn pass_brings_index_in_line_with_directory() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();

    fs::write(root.join("a.org"), "* Alpha")?;
    fs::write(root.join("b.org"), "* Beta")?;
    fs::create_dir(root.join("projects"))?;
    fs::write(root.join("projects/c.org"), "* Gamma")?;
    // Non-org and hidden files are not indexed.
    fs::write(root.join("readme.txt"), "not an outline")?;
    fs::write(root.join(".hidden.org"), "* Secret")?;

    let (indexer, index) = indexer_for(root).await?;
    let report = indexer.synchronize().await?;

    assert_eq!(report.added, 3);
    assert_eq!(report.removed, 0);
    assert_eq!(report.skipped, 0);

    // The indexed path set equals the live snapshot path set.
    let vault = LocalVault::open(root)?;
    let live: HashSet<String> = vault
        .snapshot()?
        .into_iter()
        .map(|e| e.path.display().to_string())
        .collect();
    let indexed: HashSet<String> = index
        .all_records()
        .await?
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(live, indexed);
    assert_eq!(indexed.len(), 3);

    Ok(())
}

#[tokio::test]
async fn second_pass_without_changes_writes_nothing() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("a.org"), "* Alpha")?;

    let (indexer, _index) = indexer_for(root).await?;
    indexer.synchronize().await?;

    let second = indexer.synchronize().await?;
    assert_eq!(second, SyncReport::default());

    Ok(())
}

#[tokio::test]
async fn modified_file_is_updated_and_new_file_inserted() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("a.org"), "* Alpha v1!")?;

    let (indexer, index) = indexer_for(root).await?;
    indexer.synchronize().await?;
    let a_path = root.join("a.org").display().to_string();
    let before = index.record_for(&a_path).await?.unwrap();

    // Bump only the mtime of A (same size), and drop in a brand-new B.
    let file = fs::File::options().write(true).open(root.join("a.org"))?;
    file.set_modified(SystemTime::now() + Duration::from_secs(5))?;
    drop(file);
    fs::write(root.join("b.org"), "* Beta")?;

    let report = indexer.synchronize().await?;
    assert_eq!(report.added, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.removed, 0);

    let after = index.record_for(&a_path).await?.unwrap();
    assert_ne!(before.last_modified, after.last_modified);
    assert_eq!(before.size, after.size);

    let b_path = root.join("b.org").display().to_string();
    assert!(index.record_for(&b_path).await?.is_some());
    assert!(index.content_for(&b_path).await?.unwrap().contains("Beta"));

    Ok(())
}

#[tokio::test]
async fn deleted_file_loses_both_rows_and_survivor_is_untouched() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("a.org"), "* Alpha")?;
    fs::write(root.join("b.org"), "* Beta")?;

    let (indexer, index) = indexer_for(root).await?;
    indexer.synchronize().await?;

    let a_path = root.join("a.org").display().to_string();
    let b_path = root.join("b.org").display().to_string();
    let a_before = index.record_for(&a_path).await?.unwrap();

    fs::remove_file(root.join("b.org"))?;

    let report = indexer.synchronize().await?;
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 0);

    assert!(index.record_for(&b_path).await?.is_none());
    assert!(index.content_for(&b_path).await?.is_none());
    assert_eq!(index.record_for(&a_path).await?.unwrap(), a_before);

    Ok(())
}

#[tokio::test]
async fn content_change_with_new_size_is_picked_up() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("a.org"), "* Alpha")?;

    let (indexer, index) = indexer_for(root).await?;
    indexer.synchronize().await?;

    fs::write(root.join("a.org"), "* Alpha\n** rewritten with more text")?;

    let report = indexer.synchronize().await?;
    assert_eq!(report.updated, 1);

    let a_path = root.join("a.org").display().to_string();
    let content = index.content_for(&a_path).await?.unwrap();
    assert!(content.contains("rewritten"));

    Ok(())
}

#[tokio::test]
async fn unreadable_file_is_skipped_without_failing_the_pass() -> Result<(), OrgError> {
    let tmpdir = TempDir::new().unwrap();
    let root = tmpdir.path();
    fs::write(root.join("good.org"), "* Fine")?;
    // Not valid UTF-8, so reading it as text fails.
    fs::write(root.join("garbled.org"), [0xff, 0xfe, 0xfd])?;

    let (indexer, index) = indexer_for(root).await?;
    let report = indexer.synchronize().await?;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.added, 1);

    // The readable file is indexed, the skipped one left out entirely.
    let good_path = root.join("good.org").display().to_string();
    let bad_path = root.join("garbled.org").display().to_string();
    assert!(index.record_for(&good_path).await?.is_some());
    assert!(index.record_for(&bad_path).await?.is_none());
    assert!(index.content_for(&bad_path).await?.is_none());

    Ok(())
}
