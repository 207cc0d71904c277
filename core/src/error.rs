//! Conversion errors

use std::io;

use crate::glb::GlbError;
use crate::i18n::{MessageKey, Translator};

/// Error reported by a conversion run. Every variant is terminal.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A plain file was dropped where a folder was expected
    #[error("{0} is a file, not a folder")]
    NotAFolder(String),

    #[error("no .gltf file found among the dropped files")]
    NoDescriptorFound,

    #[error("found more than one .gltf file ({first} and {second})")]
    MultipleDescriptors { first: String, second: String },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported glTF version {0:?} (expected 2.x)")]
    UnsupportedVersion(String),

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Only raised when the missing-asset policy is `fail`, or for buffers
    #[error("{owner} references {uri:?}, which was not found")]
    MissingAsset { owner: String, uri: String },

    /// Only raised when the duplicate-name policy is `fail`
    #[error("{first} and {second} share the file name {name:?}")]
    DuplicateFile {
        name: String,
        first: String,
        second: String,
    },

    #[error("failed to process glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid buffer layout: {0}")]
    Layout(String),

    #[error("failed to build GLB: {0}")]
    Glb(#[from] GlbError),
}

impl ConvertError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::NotAFolder(_) => MessageKey::NotAFolder,
            Self::NoDescriptorFound => MessageKey::NoGltfFound,
            Self::MultipleDescriptors { .. } => MessageKey::MultipleGltfFound,
            Self::FileRead { .. } => MessageKey::FileReadFailed,
            Self::FileWrite { .. } => MessageKey::FileWriteFailed,
            Self::UnsupportedVersion(_) => MessageKey::UnsupportedVersion,
            Self::MissingAsset { .. } => MessageKey::MissingAsset,
            Self::DuplicateFile { .. } => MessageKey::DuplicateFile,
            Self::InvalidDataUri(_) | Self::Json(_) | Self::Layout(_) | Self::Glb(_) => {
                MessageKey::FileDamaged
            }
        }
    }

    /// Localized text for the end user, with technical detail appended in
    /// parentheses where there is any.
    pub fn user_message(&self, translator: &dyn Translator) -> String {
        let text = translator.translate(self.message_key());
        match self {
            Self::NotAFolder(_) | Self::NoDescriptorFound => text.into_owned(),
            detailed => format!("{text} ({detailed})"),
        }
    }
}
