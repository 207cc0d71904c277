//! Destinations for finished GLB files

use std::io;
use std::path::PathBuf;

use tracing::info;

use crate::convert::GlbFile;

/// Capability that accepts a finished GLB (an upload, a file write, ...)
pub trait AssetSink {
    fn accept(&mut self, file: GlbFile) -> io::Result<()>;
}

/// Collects files in memory
impl AssetSink for Vec<GlbFile> {
    fn accept(&mut self, file: GlbFile) -> io::Result<()> {
        self.push(file);
        Ok(())
    }
}

/// Writes each file into a directory under its suggested name
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl AssetSink for DirectorySink {
    fn accept(&mut self, file: GlbFile) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.name);
        std::fs::write(&path, &file.bytes)?;
        info!(path = %path.display(), size = file.bytes.len(), "wrote GLB");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_suggested_name() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut sink = DirectorySink::new(dir.path().join("out"));
        sink.accept(GlbFile {
            name: "scene.glb".to_string(),
            bytes: vec![1, 2, 3, 4],
        })
        .unwrap();

        let expected = dir.path().join("out").join("scene.glb");
        assert_eq!(sink.written(), &[expected.clone()]);
        assert_eq!(std::fs::read(expected).unwrap(), vec![1, 2, 3, 4]);
    }
}
