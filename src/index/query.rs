use sqlx::SqlitePool;

use crate::error::OrgError;
use crate::index::store::{FileRecord, Index};

/// Search interface over the file index.
///
/// Name search is a substring match against `file_name`; content search goes
/// through the FTS5 table. Both return metadata records; callers fetch the
/// full text separately if they need it.
pub struct Query {
    pool: SqlitePool,
}

impl Query {
    pub fn new(index: &Index) -> Self {
        Self {
            pool: index.pool.clone(),
        }
    }

    /// Files whose name contains `term`, case-insensitively.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<FileRecord>, OrgError> {
        let rows = sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT path, file_name, last_modified, size
             FROM file_metadata
             WHERE file_name LIKE '%' || ? || '%'",
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_tuple).collect())
    }

    /// Files whose indexed content matches `term`.
    pub async fn search_by_content(&self, term: &str) -> Result<Vec<FileRecord>, OrgError> {
        let rows = sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT path, file_name, last_modified, size
             FROM file_metadata
             WHERE path IN (SELECT path FROM file_content WHERE file_content MATCH ?)",
        )
        .bind(fts_quote(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_tuple).collect())
    }

    /// Files matching `term` by name or by content.
    pub async fn search(&self, term: &str) -> Result<Vec<FileRecord>, OrgError> {
        let rows = sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT path, file_name, last_modified, size
             FROM file_metadata
             WHERE file_name LIKE '%' || ? || '%'
                OR path IN (SELECT path FROM file_content WHERE file_content MATCH ?)",
        )
        .bind(term)
        .bind(fts_quote(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_tuple).collect())
    }
}

/// Wraps the user's term in a quoted FTS5 string so punctuation cannot be
/// misread as query syntax.
fn fts_quote(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

fn record_from_tuple((path, file_name, last_modified, size): (String, String, i64, i64)) -> FileRecord {
    FileRecord {
        path,
        file_name,
        last_modified,
        size,
    }
}
