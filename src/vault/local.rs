use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

use crate::vault::{EntryInfo, FileVault, VaultError};

/// A vault rooted at a local filesystem directory.
///
/// The root is resolved once when the vault is constructed and threaded
/// through every call; nothing is read from ambient global state.
#[derive(Debug, Clone)]
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    /// Opens a vault at an explicit root directory.
    ///
    /// Returns [`VaultError::NotFound`] if the directory does not exist and
    /// [`VaultError::AccessDenied`] if the path exists but is not a directory.
    pub fn open(root: &Path) -> Result<Self, VaultError> {
        if !root.exists() {
            return Err(VaultError::NotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(VaultError::AccessDenied(format!(
                "vault root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Opens (creating if necessary) the default vault under
    /// `~/Documents/org`.
    pub fn open_default() -> Result<Self, VaultError> {
        let root = Self::default_root()?;
        fs::create_dir_all(&root)?;
        Self::open(&root)
    }

    /// Resolves the default vault root under the user's documents directory.
    pub fn default_root() -> Result<PathBuf, VaultError> {
        let docs = dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            .ok_or_else(|| VaultError::NotFound("documents directory".to_string()))?;
        Ok(docs.join("org"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rejects paths that escape the vault root.
    ///
    /// `..` components are refused outright rather than resolved, so a path
    /// that lexically starts under the root cannot still climb out of it.
    fn ensure_inside(&self, path: &Path) -> Result<(), VaultError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));

        if !escapes && path.starts_with(&self.root) {
            Ok(())
        } else {
            Err(VaultError::AccessDenied(path.display().to_string()))
        }
    }

    fn entry_info(path: PathBuf, meta: &fs::Metadata) -> EntryInfo {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        EntryInfo {
            last_modified: meta
                .modified()
                .ok()
                .map(epoch_millis)
                .unwrap_or_default(),
            size: meta.len(),
            is_directory: meta.is_dir(),
            name,
            path,
        }
    }

    /// Validates a proposed file name.
    ///
    /// Trims whitespace, ensures it is not empty, and rejects OS-invalid
    /// characters (`/`, `\`, `:`, `"`, `*`, `?`, `<`, `>`, `|`).
    fn valid_name(name: &str) -> Result<String, VaultError> {
        let trimmed = name.trim();

        if trimmed.is_empty() || trimmed.starts_with('.') {
            return Err(VaultError::InvalidName);
        }

        if trimmed.contains(&['/', '\\', ':', '"', '*', '?', '<', '>', '|'][..]) {
            return Err(VaultError::InvalidName);
        }

        Ok(trimmed.to_owned())
    }

    /// Atomically writes `data` to `path` via a tempfile in the same
    /// directory, so the file is never left half-written after a crash.
    fn write_atomic(path: &Path, data: &[u8]) -> Result<(), VaultError> {
        let dir = path.parent().ok_or(VaultError::InvalidName)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.persist(path).map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }
}

impl FileVault for LocalVault {
    fn list_entries(
        &self,
        dir: Option<&Path>,
        filter: Option<&str>,
    ) -> Result<Vec<EntryInfo>, VaultError> {
        let dir = dir.unwrap_or(&self.root);
        self.ensure_inside(dir)?;

        if !dir.is_dir() {
            return Err(VaultError::NotFound(dir.display().to_string()));
        }

        let needle = filter.map(str::to_lowercase);
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let meta = entry.metadata()?;

            if is_hidden(&path) {
                continue;
            }
            if !meta.is_dir() && !is_org_file(&path) {
                continue;
            }

            let info = Self::entry_info(path, &meta);

            let keep = match &needle {
                None => true,
                Some(q) => {
                    info.name.to_lowercase().contains(q)
                        || (!info.is_directory
                            && fs::read_to_string(&info.path)
                                .map(|text| text.to_lowercase().contains(q))
                                .unwrap_or(false))
                }
            };

            if keep {
                entries.push(info);
            }
        }

        Ok(entries)
    }

    fn snapshot(&self) -> Result<Vec<EntryInfo>, VaultError> {
        let mut files = Vec::new();
        // Explicit work-list instead of call-stack recursion, so arbitrarily
        // deep trees cannot blow the stack.
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();

                if is_hidden(&path) {
                    continue;
                }

                let meta = entry.metadata()?;
                if meta.is_dir() {
                    pending.push(path);
                } else if is_org_file(&path) {
                    files.push(Self::entry_info(path, &meta));
                }
            }
        }

        Ok(files)
    }

    fn entry(&self, path: &Path) -> Result<EntryInfo, VaultError> {
        self.ensure_inside(path)?;
        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VaultError::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                VaultError::AccessDenied(path.display().to_string())
            }
            _ => VaultError::Io(e),
        })?;
        Ok(Self::entry_info(path.to_path_buf(), &meta))
    }

    fn read_text(&self, path: &Path) -> Result<String, VaultError> {
        self.ensure_inside(path)?;
        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VaultError::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                VaultError::AccessDenied(path.display().to_string())
            }
            _ => VaultError::Io(e),
        })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), VaultError> {
        self.ensure_inside(path)?;
        Self::write_atomic(path, text.as_bytes())
    }

    fn create_file(&self, name: &str, text: &str) -> Result<PathBuf, VaultError> {
        let name = Self::valid_name(name)?;
        let file_name = if name.ends_with(".org") {
            name
        } else {
            format!("{name}.org")
        };

        let path = self.root.join(&file_name);
        if path.exists() {
            return Err(VaultError::AlreadyExists(file_name));
        }

        Self::write_atomic(&path, text.as_bytes())?;
        Ok(path)
    }

    fn delete_file(&self, path: &Path) -> Result<(), VaultError> {
        self.ensure_inside(path)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn has_access(&self) -> bool {
        self.root.is_dir()
    }

    fn request_access(&self) -> Result<(), VaultError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

fn is_org_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("org")
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn epoch_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
