//! glbforge core - glTF folder to GLB conversion
//!
//! Takes a dropped folder holding a glTF 2.0 asset in the "separate" layout
//! (a `.gltf` JSON file plus external `.bin` buffers and images) and packs it
//! into a single self-contained GLB file.
//!
//! # Pipeline
//!
//! - [`DirectoryWalker`] - reads every file below the dropped folders
//! - [`FileRegistry`] - collected files, keyed by lowercased base name
//! - [`AssetResolver`] - buffer/image URI to bytes (files or `data:` URIs)
//! - [`BufferLayoutPlanner`] - packs all payloads into one buffer and
//!   rewrites the descriptor to match
//! - [`write_glb`] - renders the GLB container
//! - [`Converter`] - runs the whole thing
//!
//! # Example
//!
//! ```no_run
//! use glbforge_core::{Converter, Entry, MemoryFs};
//!
//! # async fn run() -> Result<(), glbforge_core::ConvertError> {
//! let fs = MemoryFs::new()
//!     .with_file("model/scene.gltf", r#"{"asset":{"version":"2.0"},"buffers":[{"uri":"mesh.bin"}]}"#)
//!     .with_file("model/mesh.bin", vec![0u8; 16]);
//! let glb = Converter::new(fs).convert(&[Entry::directory("model")]).await?;
//! assert_eq!(glb.name, "scene.glb");
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod data_uri;
pub mod descriptor;
pub mod error;
pub mod glb;
pub mod i18n;
pub mod inspect;
pub mod layout;
pub mod mime;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod walker;

pub use convert::{Converter, GlbFile, Outcome, glb_name};
pub use descriptor::Descriptor;
pub use error::ConvertError;
pub use glb::{GlbContainer, GlbError, write_glb};
pub use i18n::{EnglishTranslator, MessageKey, Translator};
pub use inspect::{AssetKind, classify};
pub use layout::{BufferLayoutPlanner, Layout, OffsetTable, ResolvedAsset, align4};
pub use mime::mime_type_for;
pub use options::{DuplicatePolicy, MissingAssetPolicy, PackOptions};
pub use registry::FileRegistry;
pub use resolver::AssetResolver;
pub use sink::{AssetSink, DirectorySink};
pub use source::{Entry, EntryKind, EntrySource, LocalFs, MemoryFs};
pub use walker::DirectoryWalker;
