use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::error::OrgError;

/// Handle to the on-disk index database.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct Index {
    pub(crate) pool: SqlitePool,
}

/// Metadata row for one indexed file, keyed by its stable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub file_name: String,
    /// Last modification time in milliseconds since the Unix epoch.
    pub last_modified: i64,
    pub size: i64,
}

impl Index {
    /// Opens (creating if necessary) the index database at `db_path` and sets
    /// up the schema.
    pub async fn open(db_path: &Path) -> Result<Self, OrgError> {
        let connection_path = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&connection_path).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS file_metadata (
                path TEXT PRIMARY KEY NOT NULL,
                file_name TEXT NOT NULL,
                last_modified INTEGER NOT NULL,
                size INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE VIRTUAL TABLE IF NOT EXISTS file_content USING fts5(path UNINDEXED, content)",
        )
        .execute(&pool)
        .await?;

        Ok(Index { pool })
    }

    /// Returns the metadata of every indexed file.
    pub async fn all_records(&self) -> Result<Vec<FileRecord>, OrgError> {
        let rows = sqlx::query("SELECT path, file_name, last_modified, size FROM file_metadata")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    pub async fn record_for(&self, path: &str) -> Result<Option<FileRecord>, OrgError> {
        let row = sqlx::query(
            "SELECT path, file_name, last_modified, size FROM file_metadata WHERE path = ?",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    /// Returns the indexed full text for a path, if any.
    pub async fn content_for(&self, path: &str) -> Result<Option<String>, OrgError> {
        let row = sqlx::query("SELECT content FROM file_content WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get(0)))
    }

    /// Inserts or replaces a batch of files, metadata and content together,
    /// in one transaction.
    ///
    /// Replace-on-conflict makes the upsert idempotent; the FTS table has no
    /// conflict target, so its row is deleted and re-inserted instead.
    pub async fn upsert_batch(&self, records: &[(FileRecord, String)]) -> Result<(), OrgError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for (record, content) in records {
            sqlx::query(
                "INSERT OR REPLACE INTO file_metadata (path, file_name, last_modified, size)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&record.path)
            .bind(&record.file_name)
            .bind(record.last_modified)
            .bind(record.size)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM file_content WHERE path = ?")
                .bind(&record.path)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO file_content (path, content) VALUES (?, ?)")
                .bind(&record.path)
                .bind(content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a batch of files, metadata and content together, in one
    /// transaction. Unknown paths are ignored.
    pub async fn delete_batch(&self, paths: &[String]) -> Result<(), OrgError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for path in paths {
            sqlx::query("DELETE FROM file_metadata WHERE path = ?")
                .bind(path)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM file_content WHERE path = ?")
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> FileRecord {
    FileRecord {
        path: row.get(0),
        file_name: row.get(1),
        last_modified: row.get(2),
        size: row.get(3),
    }
}
