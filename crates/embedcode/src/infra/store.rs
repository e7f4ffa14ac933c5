//! Local-store collaborators that resolve `vault://` locations.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::StoreError;

/// Read-only view over the documents an embed may reference locally.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the full text of the entry at `path`.
    async fn read(&self, path: &str) -> Result<String, StoreError>;
}

/// Store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` onto the root, refusing anything that would climb out of it.
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return None;
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        (depth > 0).then_some(resolved)
    }
}

#[async_trait]
impl LocalStore for FsStore {
    async fn read(&self, path: &str) -> Result<String, StoreError> {
        let full = self.locate(path).ok_or(StoreError::NotFound)?;
        tracing::trace!(path = %full.display(), "reading local entry");

        let metadata = match tokio::fs::metadata(&full).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(err) => return Err(StoreError::Io(err)),
        };
        if !metadata.is_file() {
            return Err(StoreError::NotAFile);
        }

        Ok(tokio::fs::read_to_string(&full).await?)
    }
}

/// Store holding its entries in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.entries.insert(path.into(), contents.into());
    }

    pub fn with_entry(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<String, StoreError> {
        self.entries.get(path).cloned().ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_files_under_root() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("src"))?;
        fs::write(dir.path().join("src/lib.rs"), "pub fn lib() {}\n")?;

        let store = FsStore::new(dir.path());
        assert_eq!(store.read("src/lib.rs").await?, "pub fn lib() {}\n");
        assert_eq!(store.read("./src/../src/lib.rs").await?, "pub fn lib() {}\n");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(
            store.read("nope.rs").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn folders_are_not_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(store.read("src").await, Err(StoreError::NotAFile)));
        assert!(matches!(store.read("").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn refuses_to_escape_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vault")).unwrap();
        fs::write(dir.path().join("secret.txt"), "hidden").unwrap();

        let store = FsStore::new(dir.path().join("vault"));
        assert!(matches!(
            store.read("../secret.txt").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn memory_store_serves_inserted_entries() {
        let store = MemoryStore::new().with_entry("a.txt", "alpha");
        assert_eq!(store.read("a.txt").await.unwrap(), "alpha");
        assert!(matches!(
            store.read("b.txt").await,
            Err(StoreError::NotFound)
        ));
    }
}
