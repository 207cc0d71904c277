//! Typed view of a glTF 2.0 JSON descriptor
//!
//! Only the fields the packer rewrites are modelled: `asset.version`,
//! `buffers`, `bufferViews` and `images`. Everything else (meshes, accessors,
//! extensions, unknown keys on the modelled objects) is carried through
//! untouched in the `other` maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_uri::is_data_uri;
use crate::error::ConvertError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default)]
    pub byte_length: u64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<u64>,
    #[serde(default)]
    pub byte_length: u64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Descriptor {
    /// Parse a descriptor from raw file bytes (a leading UTF-8 BOM is ignored)
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        serde_json::from_slice(bytes)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Reject anything that is not glTF 2.x
    pub fn check_version(&self) -> Result<(), ConvertError> {
        let version = self.asset.as_ref().map(|a| a.version.as_str()).unwrap_or("");
        let major = version.split('.').next().unwrap_or("");
        if major == "2" {
            Ok(())
        } else {
            Err(ConvertError::UnsupportedVersion(version.to_string()))
        }
    }

    /// URIs of buffers and images that point outside the JSON file
    pub fn external_references(&self) -> impl Iterator<Item = &str> {
        let buffers = self.buffers.iter().filter_map(|b| b.uri.as_deref());
        let images = self.images.iter().filter_map(|i| i.uri.as_deref());
        buffers.chain(images).filter(|uri| !is_data_uri(uri))
    }

    /// True when every buffer and image is inlined as a `data:` URI
    pub fn is_embedded(&self) -> bool {
        self.external_references().next().is_none()
    }
}

impl BufferView {
    pub fn new(buffer: usize, byte_offset: u64, byte_length: u64) -> Self {
        Self {
            buffer,
            byte_offset: Some(byte_offset),
            byte_length,
            other: Map::new(),
        }
    }
}
