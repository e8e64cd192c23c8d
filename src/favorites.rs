//! Flat-file favorites store.
//!
//! Favorited paths live one per line in a hidden file under the vault root.
//! Reads tolerate a missing file (empty set); every mutation rewrites the
//! file atomically.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const FAVORITES_FILE_NAME: &str = ".orgnote_favorites";

pub struct Favorites {
    path: PathBuf,
}

impl Favorites {
    /// Opens the favorites store inside `root`, without touching the disk.
    /// The backing file is created lazily on the first mutation.
    pub fn open(root: &Path) -> Self {
        Self {
            path: root.join(FAVORITES_FILE_NAME),
        }
    }

    pub fn add(&self, id: &str) -> std::io::Result<()> {
        let mut favorites = self.read_set()?;
        if favorites.insert(id.to_string()) {
            self.write_set(&favorites)?;
        }
        Ok(())
    }

    pub fn remove(&self, id: &str) -> std::io::Result<()> {
        let mut favorites = self.read_set()?;
        if favorites.remove(id) {
            self.write_set(&favorites)?;
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> std::io::Result<bool> {
        Ok(self.read_set()?.contains(id))
    }

    pub fn list(&self) -> std::io::Result<BTreeSet<String>> {
        self.read_set()
    }

    pub fn clear(&self) -> std::io::Result<()> {
        self.write_set(&BTreeSet::new())
    }

    /// Adds the id if absent, removes it if present. Returns whether the id
    /// is a favorite afterwards.
    pub fn toggle(&self, id: &str) -> std::io::Result<bool> {
        let mut favorites = self.read_set()?;
        let now_favorite = favorites.insert(id.to_string());
        if !now_favorite {
            favorites.remove(id);
        }
        self.write_set(&favorites)?;
        Ok(now_favorite)
    }

    fn read_set(&self) -> std::io::Result<BTreeSet<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(e) => Err(e),
        }
    }

    fn write_set(&self, favorites: &BTreeSet<String>) -> std::io::Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| std::io::Error::other("favorites file has no parent directory"))?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        for favorite in favorites {
            writeln!(tmp, "{favorite}")?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
