//! Classification of single uploaded model files
//!
//! A `.glb` is usable as-is, as is a `.gltf` with every buffer and image
//! inlined. A `.gltf` that references external files has to go through the
//! folder conversion instead.

use std::path::Path;

use crate::descriptor::Descriptor;
use crate::glb::GlbContainer;
use crate::i18n::MessageKey;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["gltf", "glb"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    Glb,
    EmbeddedGltf,
    /// Needs the folder conversion; lists the external URIs
    SeparateGltf(Vec<String>),
    /// Unreadable file, with the reason
    Damaged(String),
    /// Extension other than `gltf`/`glb`
    Unsupported(String),
}

impl AssetKind {
    /// Whether the file can be used without conversion
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Glb | Self::EmbeddedGltf)
    }

    /// Message to show the user, if the file is not usable
    pub fn message_key(&self) -> Option<MessageKey> {
        match self {
            Self::Glb | Self::EmbeddedGltf => None,
            Self::SeparateGltf(_) => Some(MessageKey::OnlyEmbeddedAssets),
            Self::Damaged(_) => Some(MessageKey::FileDamaged),
            Self::Unsupported(_) => Some(MessageKey::FiletypeNotSupported),
        }
    }
}

pub fn classify(name: &str, bytes: &[u8]) -> AssetKind {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "glb" => match GlbContainer::parse(bytes) {
            Ok(_) => AssetKind::Glb,
            Err(e) => AssetKind::Damaged(e.to_string()),
        },
        "gltf" => match Descriptor::from_slice(bytes) {
            Ok(descriptor) => {
                let external: Vec<String> = descriptor
                    .external_references()
                    .map(str::to_string)
                    .collect();
                if external.is_empty() {
                    AssetKind::EmbeddedGltf
                } else {
                    AssetKind::SeparateGltf(external)
                }
            }
            Err(e) => AssetKind::Damaged(e.to_string()),
        },
        _ => AssetKind::Unsupported(extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let kind = classify("model.OBJ", b"v 0 0 0");
        assert_eq!(kind, AssetKind::Unsupported("obj".to_string()));
        assert_eq!(kind.message_key(), Some(MessageKey::FiletypeNotSupported));
    }

    #[test]
    fn test_embedded_and_separate_gltf() {
        let embedded = br#"{"asset":{"version":"2.0"},"buffers":[{"uri":"data:;base64,AAAA","byteLength":3}]}"#;
        assert_eq!(classify("a.gltf", embedded), AssetKind::EmbeddedGltf);
        assert!(classify("a.GLTF", embedded).is_usable());

        let separate = br#"{"asset":{"version":"2.0"},"buffers":[{"uri":"a.bin"}],"images":[{"uri":"t.png"}]}"#;
        let kind = classify("a.gltf", separate);
        assert_eq!(
            kind,
            AssetKind::SeparateGltf(vec!["a.bin".to_string(), "t.png".to_string()])
        );
        assert_eq!(kind.message_key(), Some(MessageKey::OnlyEmbeddedAssets));
    }

    #[test]
    fn test_damaged_files() {
        assert!(matches!(classify("a.gltf", b"{"), AssetKind::Damaged(_)));
        assert!(matches!(classify("a.glb", b"glTF\x02"), AssetKind::Damaged(_)));
    }
}
