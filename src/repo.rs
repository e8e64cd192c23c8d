//! The repository facade: the handful of operations a frontend needs.
//!
//! Composes the vault, the outline model, the index, and the favorites store
//! behind [`OrgResult`] operations. Listing without a search term reads the
//! live directory so files dropped in from outside are visible before the
//! next index pass; listing with a search term unions index matches with a
//! live scan of the current level.

use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::error::{OrgError, OrgResult};
use crate::favorites::Favorites;
use crate::index::query::Query;
use crate::index::store::Index;
use crate::outline::{self, OrgNode};
use crate::vault::{EntryInfo, FileVault, local::LocalVault};

/// Per-session repository configuration, resolved once at construction.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Name of the append-only capture file, relative to the vault root.
    pub inbox_name: String,
    /// Name of the index database file, relative to the vault root.
    pub index_db_name: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            inbox_name: "capture.org".to_string(),
            index_db_name: ".orgnote_index.db".to_string(),
        }
    }
}

/// A parsed outline document.
#[derive(Debug, Clone)]
pub struct OrgDocument {
    pub path: PathBuf,
    pub file_name: String,
    /// The raw text as read from disk. Writes always persist this field,
    /// never a re-serialization of `nodes`, so manual edits survive verbatim.
    pub content: String,
    pub last_modified: i64,
    /// Free text before the first heading.
    pub preamble: String,
    pub nodes: Vec<OrgNode>,
}

impl OrgDocument {
    /// Re-serializes the parsed outline, for callers that edit `nodes`
    /// instead of `content`.
    pub fn render_outline(&self) -> String {
        outline::serialize(&self.preamble, &self.nodes)
    }
}

/// One row of a file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub last_modified: i64,
    pub size: i64,
    pub is_directory: bool,
    pub is_favorite: bool,
}

pub struct NoteRepository {
    vault: Arc<dyn FileVault>,
    index: Index,
    query: Query,
    favorites: Favorites,
    inbox_path: PathBuf,
}

impl NoteRepository {
    /// Opens a repository over a local vault root with default configuration.
    pub async fn open(root: &Path) -> OrgResult<Self> {
        Self::with_config(root, RepoConfig::default()).await
    }

    pub async fn with_config(root: &Path, config: RepoConfig) -> OrgResult<Self> {
        let vault = LocalVault::open(root)?;
        let index = Index::open(&root.join(&config.index_db_name)).await?;
        let query = Query::new(&index);
        let favorites = Favorites::open(root);
        let inbox_path = root.join(&config.inbox_name);

        Ok(Self {
            vault: Arc::new(vault),
            index,
            query,
            favorites,
            inbox_path,
        })
    }

    /// The index handle, for wiring up a synchronizer over this repository.
    pub fn index(&self) -> Index {
        self.index.clone()
    }

    /// The vault handle, for the same purpose.
    pub fn vault(&self) -> Arc<dyn FileVault> {
        self.vault.clone()
    }

    /// Lists files, optionally under a subdirectory and/or matching a search
    /// term.
    ///
    /// Without a term this is a live listing of one directory level and the
    /// index is bypassed entirely. With a term, full-text and name matches
    /// from the index are unioned with a live name/content scan of the
    /// current level and de-duplicated by path. Directories sort before
    /// files, then by name.
    pub async fn list(&self, dir: Option<&Path>, term: Option<&str>) -> OrgResult<Vec<FileEntry>> {
        let term = term.map(str::trim).filter(|t| !t.is_empty());
        let favorites = self.favorites.list()?;

        let mut entries: Vec<FileEntry> = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for info in self.vault.list_entries(dir, term)? {
            seen.insert(info.path.clone());
            entries.push(file_entry(info, &favorites));
        }

        if let Some(term) = term {
            debug!(term, "searching index");
            for record in self.query.search(term).await? {
                let path = PathBuf::from(&record.path);
                if seen.insert(path.clone()) {
                    entries.push(FileEntry {
                        is_favorite: favorites.contains(&record.path),
                        name: record.file_name,
                        last_modified: record.last_modified,
                        size: record.size,
                        is_directory: false,
                        path,
                    });
                }
            }
        }

        entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        Ok(entries)
    }

    /// Reads a file and parses it into the outline model.
    pub fn read(&self, path: &Path) -> OrgResult<OrgDocument> {
        let content = self.vault.read_text(path)?;
        let (preamble, nodes) = outline::parse(&content);

        // A racing delete between the read and the stat degrades to zero
        // rather than failing a read that already succeeded.
        let last_modified = self
            .vault
            .entry(path)
            .map(|info| info.last_modified)
            .unwrap_or(0);

        Ok(OrgDocument {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            content,
            last_modified,
            preamble,
            nodes,
        })
    }

    /// Persists a document's raw content back to its file.
    pub fn write(&self, doc: &OrgDocument) -> OrgResult<()> {
        self.vault.write_text(&doc.path, &doc.content)?;
        Ok(())
    }

    /// Creates a new outline file under the root and returns its path.
    pub fn create(&self, name: &str, content: &str) -> OrgResult<PathBuf> {
        Ok(self.vault.create_file(name, content)?)
    }

    pub fn delete(&self, path: &Path) -> OrgResult<()> {
        self.vault.delete_file(path)?;
        Ok(())
    }

    /// Appends a timestamped capture entry to the inbox file, creating the
    /// file with a header block on first use.
    ///
    /// The entry's first line becomes a `*` heading with a `:CREATED:`
    /// property; any remaining lines are indented as the entry body. Fails
    /// if the file's byte size did not strictly increase.
    pub fn append_to_inbox(&self, text: &str) -> OrgResult<()> {
        let existing = match self.vault.read_text(&self.inbox_path) {
            Ok(content) => content,
            Err(crate::vault::VaultError::NotFound(_)) => {
                let header = format!(
                    "#+TITLE: Capture\n#+DATE: {}\n\n",
                    Local::now().format("%Y-%m-%d")
                );
                self.vault.write_text(&self.inbox_path, &header)?;
                header
            }
            Err(e) => return Err(e.into()),
        };

        let old_size = existing.len();
        let entry = format_capture_entry(text, &Local::now().format("%Y-%m-%d %H:%M").to_string());
        self.vault
            .write_text(&self.inbox_path, &format!("{existing}{entry}"))?;

        if self.inbox_size()? <= old_size as u64 {
            return Err(OrgError::Other(
                "inbox file did not grow after append".to_string(),
            ));
        }
        Ok(())
    }

    /// Current byte size of the inbox file; zero when it does not exist yet.
    pub fn inbox_size(&self) -> OrgResult<u64> {
        match self.vault.entry(&self.inbox_path) {
            Ok(info) => Ok(info.size),
            Err(crate::vault::VaultError::NotFound(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn toggle_favorite(&self, path: &Path) -> OrgResult<bool> {
        Ok(self.favorites.toggle(&path.display().to_string())?)
    }

    pub fn is_favorite(&self, path: &Path) -> OrgResult<bool> {
        Ok(self.favorites.contains(&path.display().to_string())?)
    }

    pub fn favorite_paths(&self) -> OrgResult<Vec<PathBuf>> {
        Ok(self
            .favorites
            .list()?
            .into_iter()
            .map(PathBuf::from)
            .collect())
    }

    pub fn has_access(&self) -> bool {
        self.vault.has_access()
    }
}

fn file_entry(info: EntryInfo, favorites: &std::collections::BTreeSet<String>) -> FileEntry {
    FileEntry {
        is_favorite: favorites.contains(&info.path.display().to_string()),
        name: info.name,
        last_modified: info.last_modified,
        size: info.size as i64,
        is_directory: info.is_directory,
        path: info.path,
    }
}

/// Formats one capture entry: heading, `:CREATED:` property drawer, and the
/// remaining lines indented as the body.
fn format_capture_entry(text: &str, timestamp: &str) -> String {
    let mut lines = text.lines();
    let title = lines.next().unwrap_or("").trim();
    let body: Vec<String> = lines.map(|line| format!("  {line}")).collect();

    let mut entry = format!("\n* {title}\n  :PROPERTIES:\n  :CREATED: {timestamp}\n  :END:\n");
    if !body.is_empty() {
        entry.push_str(&body.join("\n"));
        entry.push('\n');
    }
    entry
}
