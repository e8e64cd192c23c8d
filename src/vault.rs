//! Storage-tree access for a vault of org outline files.
//!
//! A vault is a user-chosen directory holding `.org` files. All file access
//! goes through the [`FileVault`] capability trait so a platform port only
//! has to implement list/read/write/create/delete once; [`local::LocalVault`]
//! is the native-filesystem implementation.

pub mod local;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid file name")]
    InvalidName,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One entry of a directory listing or snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub name: String,
    /// Last modification time in milliseconds since the Unix epoch.
    pub last_modified: i64,
    pub size: u64,
    pub is_directory: bool,
}

/// Capability interface over a vault's storage tree.
///
/// The repository and the index synchronizer only ever talk to this trait.
/// Implementations must be safe to share across worker tasks.
pub trait FileVault: Send + Sync {
    /// Lists one directory level: subdirectories plus `.org` files.
    ///
    /// `dir` of `None` lists the vault root. An optional `filter` keeps only
    /// entries whose name (or, for files, content) contains the given string,
    /// case-insensitively. Files whose content cannot be read are excluded
    /// from content matching rather than failing the listing.
    fn list_entries(
        &self,
        dir: Option<&Path>,
        filter: Option<&str>,
    ) -> Result<Vec<EntryInfo>, VaultError>;

    /// Enumerates every non-hidden `.org` file under the root, recursively.
    ///
    /// This is the live directory snapshot the synchronizer diffs against the
    /// index. Enumeration order is unspecified.
    fn snapshot(&self) -> Result<Vec<EntryInfo>, VaultError>;

    /// Looks up one entry by path, without reading its content.
    fn entry(&self, path: &Path) -> Result<EntryInfo, VaultError>;

    fn read_text(&self, path: &Path) -> Result<String, VaultError>;

    fn write_text(&self, path: &Path, text: &str) -> Result<(), VaultError>;

    /// Creates a new file under the root and returns its path.
    ///
    /// The `.org` extension is appended when missing. Refuses to overwrite an
    /// existing file.
    fn create_file(&self, name: &str, text: &str) -> Result<PathBuf, VaultError>;

    /// Deletes a file. Deleting a path that no longer exists is a no-op.
    fn delete_file(&self, path: &Path) -> Result<(), VaultError>;

    /// Whether the vault root currently exists and is readable.
    fn has_access(&self) -> bool;

    /// Makes the vault root available, creating it if missing.
    fn request_access(&self) -> Result<(), VaultError>;
}
