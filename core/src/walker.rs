//! Recursive walk over dropped folders
//!
//! Every directory listing and file read runs as its own task in a
//! [`JoinSet`]. Children of a listed directory are spawned into the set before
//! the next completion is polled, so the set only drains once the whole tree
//! has been read. Completion order across siblings is not relied upon.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::error::ConvertError;
use crate::options::{DuplicatePolicy, PackOptions};
use crate::registry::FileRegistry;
use crate::source::{Entry, EntrySource};

/// Result of one finished task
enum Visit {
    Listed(Vec<Entry>),
    Read(Entry, Vec<u8>),
}

pub struct DirectoryWalker<S> {
    source: Arc<S>,
    options: PackOptions,
}

impl<S: EntrySource> DirectoryWalker<S> {
    pub fn new(source: Arc<S>, options: PackOptions) -> Self {
        Self { source, options }
    }

    /// Read every file below the dropped folders into a fresh registry.
    ///
    /// Fails with [`ConvertError::NotAFolder`] before touching anything if a
    /// top-level item is a plain file.
    pub async fn walk(&self, items: &[Entry]) -> Result<FileRegistry, ConvertError> {
        if let Some(file) = items.iter().find(|item| item.is_file()) {
            return Err(ConvertError::NotAFolder(file.display_path()));
        }

        let mut registry = FileRegistry::new();
        let mut pending = JoinSet::new();
        for item in items {
            self.spawn_visit(&mut pending, item.clone());
        }

        while let Some(joined) = pending.join_next().await {
            let visit = joined.map_err(|e| ConvertError::FileRead {
                path: "(walker task)".to_string(),
                source: io::Error::other(e),
            })??;

            match visit {
                Visit::Listed(children) => {
                    for child in children {
                        self.spawn_visit(&mut pending, child);
                    }
                }
                Visit::Read(entry, bytes) => self.register(&mut registry, &entry, bytes)?,
            }
        }

        Ok(registry)
    }

    fn spawn_visit(&self, pending: &mut JoinSet<Result<Visit, ConvertError>>, entry: Entry) {
        let fs = Arc::clone(&self.source);
        if entry.is_file() {
            pending.spawn(async move {
                let bytes = fs.read_file(&entry).await.map_err(|source| {
                    ConvertError::FileRead {
                        path: entry.display_path(),
                        source,
                    }
                })?;
                Ok(Visit::Read(entry, bytes))
            });
        } else {
            pending.spawn(async move {
                let children = fs.list_directory(&entry).await.map_err(|source| {
                    ConvertError::FileRead {
                        path: entry.display_path(),
                        source,
                    }
                })?;
                debug!(dir = %entry.display_path(), count = children.len(), "listed directory");
                Ok(Visit::Listed(children))
            });
        }
    }

    fn register(
        &self,
        registry: &mut FileRegistry,
        entry: &Entry,
        bytes: Vec<u8>,
    ) -> Result<(), ConvertError> {
        let name = entry.name();
        let path = entry.display_path();

        if is_descriptor_name(&name) {
            let descriptor = Descriptor::from_slice(&bytes)?;
            debug!(%path, "found glTF descriptor");
            if let Some(previous) = registry.set_descriptor(&name, descriptor) {
                return Err(ConvertError::MultipleDescriptors {
                    first: previous.file_name,
                    second: name,
                });
            }
            return Ok(());
        }

        debug!(%path, size = bytes.len(), "collected file");
        if let Some(replaced) = registry.put(&path, bytes) {
            match self.options.duplicate_names {
                DuplicatePolicy::LastWins => {
                    warn!(kept = %path, dropped = %replaced.path, "duplicate file name")
                }
                DuplicatePolicy::Fail => {
                    return Err(ConvertError::DuplicateFile {
                        name,
                        first: replaced.path,
                        second: path,
                    });
                }
            }
        }
        Ok(())
    }
}

fn is_descriptor_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gltf"))
}
