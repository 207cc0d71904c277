//! Turns a buffer or image URI into bytes

use std::borrow::Cow;

use crate::data_uri::{DataUri, is_data_uri, percent_decode};
use crate::error::ConvertError;
use crate::registry::{FileRegistry, registry_key};

/// Bytes behind a URI. Registry files are borrowed, data URIs are decoded.
#[derive(Debug, Clone)]
pub struct Payload<'a> {
    pub bytes: Cow<'a, [u8]>,
    /// Media type declared by a data URI
    pub media_type: Option<String>,
}

pub struct AssetResolver<'a> {
    registry: &'a FileRegistry,
}

impl<'a> AssetResolver<'a> {
    pub fn new(registry: &'a FileRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a URI.
    ///
    /// Returns `Ok(None)` when there is no URI or no collected file matches
    /// it; an undecodable data URI is an error.
    pub fn resolve(&self, uri: Option<&str>) -> Result<Option<Payload<'a>>, ConvertError> {
        let Some(uri) = uri else {
            return Ok(None);
        };

        if is_data_uri(uri) {
            let data = DataUri::parse(uri)?;
            return Ok(Some(Payload {
                bytes: Cow::Owned(data.decode()?),
                media_type: data.media_type.map(str::to_string),
            }));
        }

        Ok(self.lookup(uri).map(|bytes| Payload {
            bytes: Cow::Borrowed(bytes),
            media_type: None,
        }))
    }

    fn lookup(&self, uri: &str) -> Option<&'a [u8]> {
        let key = registry_key(uri);
        self.registry.get(&key).or_else(|| {
            // "my%20texture.png" on disk is "my texture.png". An encoded
            // separator ("a%2Fb.png") decodes to a path, and `get` keys it
            // by its last segment like any other path.
            let decoded = String::from_utf8(percent_decode(&key)).ok()?;
            (decoded != key)
                .then(|| self.registry.get(&decoded))
                .flatten()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FileRegistry {
        let mut registry = FileRegistry::new();
        registry.put("model/data/mesh.bin", vec![1, 2, 3, 4, 5]);
        registry.put("model/my texture.png", vec![7]);
        registry
    }

    #[test]
    fn test_absent_uri_resolves_to_nothing() {
        let registry = registry();
        assert!(AssetResolver::new(&registry).resolve(None).unwrap().is_none());
    }

    #[test]
    fn test_relative_uri_is_case_insensitive() {
        let registry = registry();
        let payload = AssetResolver::new(&registry)
            .resolve(Some("Data/mesh.BIN"))
            .unwrap()
            .unwrap();
        assert_eq!(payload.bytes.as_ref(), &[1, 2, 3, 4, 5]);
        assert!(matches!(payload.bytes, Cow::Borrowed(_)));
    }

    #[test]
    fn test_percent_encoded_uri() {
        let registry = registry();
        let payload = AssetResolver::new(&registry)
            .resolve(Some("My%20Texture.png"))
            .unwrap()
            .unwrap();
        assert_eq!(payload.bytes.as_ref(), &[7]);
    }

    #[test]
    fn test_unknown_file_resolves_to_nothing() {
        let registry = registry();
        let resolved = AssetResolver::new(&registry)
            .resolve(Some("missing.bin"))
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_encoded_separator_matches_last_segment() {
        let registry = registry();
        let payload = AssetResolver::new(&registry)
            .resolve(Some("textures%2FMy%20Texture.png"))
            .unwrap()
            .unwrap();
        assert_eq!(payload.bytes.as_ref(), &[7]);
    }

    #[test]
    fn test_data_uri_is_decoded() {
        let registry = registry();
        let payload = AssetResolver::new(&registry)
            .resolve(Some("data:image/png;base64,AQID"))
            .unwrap()
            .unwrap();
        assert_eq!(payload.bytes.as_ref(), &[1, 2, 3]);
        assert_eq!(payload.media_type.as_deref(), Some("image/png"));
    }
}
