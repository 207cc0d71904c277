//! Dropped filesystem entries
//!
//! An [`EntrySource`] is whatever can enumerate directories and read files on
//! behalf of the walker: the local filesystem ([`LocalFs`]) or a tree of
//! files already held in memory ([`MemoryFs`]).

use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One file or directory handed over by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Base name of the entry
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Asynchronous directory listing and file reads
pub trait EntrySource: Send + Sync + 'static {
    /// Immediate children of a directory entry
    fn list_directory(&self, dir: &Entry) -> impl Future<Output = io::Result<Vec<Entry>>> + Send;

    /// Full contents of a file entry
    fn read_file(&self, file: &Entry) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// The local filesystem, via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Classify a path as a file or directory entry (symlinks are followed)
    pub async fn entry(path: impl Into<PathBuf>) -> io::Result<Entry> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Ok(Entry::new(path, kind))
    }
}

impl EntrySource for LocalFs {
    async fn list_directory(&self, dir: &Entry) -> io::Result<Vec<Entry>> {
        let mut read_dir = tokio::fs::read_dir(&dir.path).await?;
        let mut entries = Vec::new();
        while let Some(child) = read_dir.next_entry().await? {
            entries.push(Self::entry(child.path()).await?);
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn read_file(&self, file: &Entry) -> io::Result<Vec<u8>> {
        tokio::fs::read(&file.path).await
    }
}

/// In-memory file tree. Directories are implied by the file paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Entry for a stored file or an implied directory
    pub fn entry(&self, path: impl AsRef<Path>) -> Option<Entry> {
        let path = path.as_ref();
        if self.files.contains_key(path) {
            return Some(Entry::file(path));
        }
        self.files
            .keys()
            .any(|file| file.starts_with(path))
            .then(|| Entry::directory(path))
    }
}

impl EntrySource for MemoryFs {
    async fn list_directory(&self, dir: &Entry) -> io::Result<Vec<Entry>> {
        let mut children = BTreeMap::new();
        for file in self.files.keys() {
            let Ok(relative) = file.strip_prefix(&dir.path) else {
                continue;
            };
            let mut components = relative.components();
            let Some(first) = components.next() else {
                continue;
            };
            let kind = if components.next().is_some() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            children.insert(dir.path.join(first), kind);
        }

        // Empty directories cannot exist here
        if children.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no directory {}", dir.path.display()),
            ));
        }
        Ok(children
            .into_iter()
            .map(|(path, kind)| Entry::new(path, kind))
            .collect())
    }

    async fn read_file(&self, file: &Entry) -> io::Result<Vec<u8>> {
        self.files.get(&file.path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no file {}", file.path.display()),
            )
        })
    }
}
