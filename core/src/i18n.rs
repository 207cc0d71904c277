//! User-facing messages
//!
//! The library never formats end-user text on its own. Every error and
//! inspection result maps to a [`MessageKey`], and the host supplies a
//! [`Translator`] that turns the key into a localized string.

use std::borrow::Cow;

/// Identifier of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    NotAFolder,
    NoGltfFound,
    MultipleGltfFound,
    FileReadFailed,
    FileWriteFailed,
    FileDamaged,
    UnsupportedVersion,
    MissingAsset,
    DuplicateFile,
    OnlyEmbeddedAssets,
    FiletypeNotSupported,
}

/// Capability for turning message keys into user-facing text
pub trait Translator {
    fn translate(&self, key: MessageKey) -> Cow<'_, str>;
}

/// Built-in English messages
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, key: MessageKey) -> Cow<'_, str> {
        Cow::Borrowed(match key {
            MessageKey::NotAFolder => "Please drop a folder, not a single file.",
            MessageKey::NoGltfFound => "The folder does not contain a glTF file.",
            MessageKey::MultipleGltfFound => "The folder contains more than one glTF file.",
            MessageKey::FileReadFailed => "A file could not be read.",
            MessageKey::FileWriteFailed => "The converted file could not be saved.",
            MessageKey::FileDamaged => "The file seems to be damaged.",
            MessageKey::UnsupportedVersion => "Only glTF 2.0 files are supported.",
            MessageKey::MissingAsset => "A file referenced by the glTF file is missing.",
            MessageKey::DuplicateFile => "The folder contains two files with the same name.",
            MessageKey::OnlyEmbeddedAssets => {
                "glTF files must have all assets embedded. Convert the folder to a GLB file instead."
            }
            MessageKey::FiletypeNotSupported => "Only glTF and GLB files are supported.",
        })
    }
}
