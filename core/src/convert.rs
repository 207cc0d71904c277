//! Folder to GLB conversion

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ConvertError;
use crate::glb::write_glb;
use crate::i18n::Translator;
use crate::layout::BufferLayoutPlanner;
use crate::options::PackOptions;
use crate::registry::NamedDescriptor;
use crate::resolver::AssetResolver;
use crate::sink::AssetSink;
use crate::source::{Entry, EntrySource};
use crate::walker::DirectoryWalker;

/// A finished GLB and the file name it should be stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlbFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result shape handed to a conversion callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    File(GlbFile),
    /// Localized, user-facing reason
    Error(String),
}

pub struct Converter<S> {
    source: Arc<S>,
    options: PackOptions,
}

impl<S: EntrySource> Converter<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, PackOptions::default())
    }

    pub fn with_options(source: S, options: PackOptions) -> Self {
        Self {
            source: Arc::new(source),
            options,
        }
    }

    /// Convert dropped folders holding a separate glTF asset into one GLB
    pub async fn convert(&self, items: &[Entry]) -> Result<GlbFile, ConvertError> {
        let walker = DirectoryWalker::new(Arc::clone(&self.source), self.options);
        let mut registry = walker.walk(items).await?;

        let NamedDescriptor {
            file_name,
            mut descriptor,
        } = registry
            .take_descriptor()
            .ok_or(ConvertError::NoDescriptorFound)?;
        descriptor.check_version()?;

        let planner = BufferLayoutPlanner::new(AssetResolver::new(&registry), self.options);
        let layout = planner.plan(&mut descriptor)?;
        let bytes = write_glb(&descriptor, &layout)?;

        info!(
            descriptor = %file_name,
            files = registry.len(),
            assets = layout.assets.len(),
            bin_bytes = layout.bin_length,
            size = bytes.len(),
            "converted glTF folder to GLB"
        );

        Ok(GlbFile {
            name: glb_name(&file_name),
            bytes,
        })
    }

    /// Callback form: `callback` is invoked exactly once, with either the
    /// finished file or a translated error message.
    pub async fn convert_with<F>(&self, items: &[Entry], translator: &dyn Translator, callback: F)
    where
        F: FnOnce(Outcome),
    {
        let outcome = match self.convert(items).await {
            Ok(file) => Outcome::File(file),
            Err(e) => {
                warn!(error = %e, "conversion failed");
                Outcome::Error(e.user_message(translator))
            }
        };
        callback(outcome);
    }

    /// Convert and hand the result to a sink
    pub async fn convert_into<K: AssetSink>(
        &self,
        items: &[Entry],
        sink: &mut K,
    ) -> Result<(), ConvertError> {
        let file = self.convert(items).await?;
        let name = file.name.clone();
        sink.accept(file).map_err(|source| ConvertError::FileWrite {
            path: name,
            source,
        })
    }
}

/// `scene.gltf` becomes `scene.glb`
pub fn glb_name(descriptor_name: &str) -> String {
    let stem = Path::new(descriptor_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "model".to_string());
    format!("{stem}.glb")
}
