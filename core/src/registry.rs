//! Files collected from a dropped folder, keyed by lowercased base name

use hashbrown::HashMap;

use crate::descriptor::Descriptor;

/// Registry key for a file name or relative URI: the base name, lowercased
pub fn registry_key(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.to_lowercase()
}

/// A collected file and the path it was found at
#[derive(Debug, Clone)]
pub struct RegisteredFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// The parsed `.gltf` file and its name
#[derive(Debug, Clone)]
pub struct NamedDescriptor {
    pub file_name: String,
    pub descriptor: Descriptor,
}

#[derive(Debug, Default)]
pub struct FileRegistry {
    files: HashMap<String, RegisteredFile>,
    descriptor: Option<NamedDescriptor>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file. A file with the same base name is replaced and returned.
    pub fn put(&mut self, path: &str, bytes: Vec<u8>) -> Option<RegisteredFile> {
        let file = RegisteredFile {
            path: path.to_string(),
            bytes,
        };
        self.files.insert(registry_key(path), file)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(&registry_key(name)).map(|f| f.bytes.as_slice())
    }

    /// Store the descriptor, returning a previously stored one
    pub fn set_descriptor(
        &mut self,
        file_name: &str,
        descriptor: Descriptor,
    ) -> Option<NamedDescriptor> {
        self.descriptor.replace(NamedDescriptor {
            file_name: file_name.to_string(),
            descriptor,
        })
    }

    pub fn descriptor(&self) -> Option<&NamedDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn take_descriptor(&mut self) -> Option<NamedDescriptor> {
        self.descriptor.take()
    }

    /// Number of stored files, not counting the descriptor
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
