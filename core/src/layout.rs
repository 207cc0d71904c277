//! Combined buffer layout
//!
//! All buffers and images of a descriptor are packed into one binary buffer.
//! Buffers are resolved first, then images, each into index-keyed slots.
//! Offsets are only assigned afterwards, in one pass over both slot lists, so
//! the order in which payloads become available never affects the layout.
//!
//! Asset indices: buffers are `0..B`, images are `B..B + I`.

use std::borrow::Cow;

use serde_json::Map;
use tracing::{debug, warn};

use crate::descriptor::{Buffer, BufferView, Descriptor};
use crate::error::ConvertError;
use crate::mime::mime_type_for;
use crate::options::{MissingAssetPolicy, PackOptions};
use crate::resolver::{AssetResolver, Payload};

/// Round up to the next multiple of 4
pub const fn align4(n: usize) -> usize {
    match n % 4 {
        0 => n,
        rem => n + (4 - rem),
    }
}

/// One payload placed in the combined buffer
#[derive(Debug, Clone)]
pub struct ResolvedAsset<'a> {
    pub bytes: Cow<'a, [u8]>,
    pub offset: usize,
    pub aligned_len: usize,
}

/// Asset index to byte offset. Unresolved images have no offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetTable {
    buffer_count: usize,
    offsets: Vec<Option<usize>>,
}

impl OffsetTable {
    fn new(buffer_count: usize, image_count: usize) -> Self {
        Self {
            buffer_count,
            offsets: vec![None; buffer_count + image_count],
        }
    }

    fn set(&mut self, asset_index: usize, offset: usize) {
        self.offsets[asset_index] = Some(offset);
    }

    pub fn get(&self, asset_index: usize) -> Option<usize> {
        self.offsets.get(asset_index).copied().flatten()
    }

    pub fn buffer(&self, index: usize) -> Option<usize> {
        if index < self.buffer_count {
            self.get(index)
        } else {
            None
        }
    }

    pub fn image(&self, index: usize) -> Option<usize> {
        self.get(self.buffer_count + index)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Planned content of the BIN chunk
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    /// Placed payloads, buffers first, in array order
    pub assets: Vec<ResolvedAsset<'a>>,
    pub offsets: OffsetTable,
    /// Sum of all aligned payload lengths
    pub bin_length: usize,
}

pub struct BufferLayoutPlanner<'a> {
    resolver: AssetResolver<'a>,
    options: PackOptions,
}

impl<'a> BufferLayoutPlanner<'a> {
    pub fn new(resolver: AssetResolver<'a>, options: PackOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolve every buffer and image, rewrite the descriptor to point into
    /// a single combined buffer and return where each payload goes.
    pub fn plan(&self, descriptor: &mut Descriptor) -> Result<Layout<'a>, ConvertError> {
        let buffer_payloads = descriptor
            .buffers
            .iter()
            .enumerate()
            .map(|(index, buffer)| self.resolve_buffer(index, buffer.uri.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        let image_payloads = descriptor
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| self.resolve_image(index, image.uri.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        let buffer_count = buffer_payloads.len();
        let original_view_count = descriptor.buffer_views.len();
        let mut offsets = OffsetTable::new(buffer_count, image_payloads.len());
        let mut assets = Vec::with_capacity(buffer_count + image_payloads.len());
        let mut cursor = 0;

        for (index, (buffer, payload)) in descriptor
            .buffers
            .iter_mut()
            .zip(buffer_payloads)
            .enumerate()
        {
            let len = payload.bytes.len();
            buffer.uri = None;
            buffer.byte_length = len as u64;
            offsets.set(index, cursor);
            debug!(buffer = index, offset = cursor, len, "placed buffer");

            assets.push(ResolvedAsset {
                bytes: payload.bytes,
                offset: cursor,
                aligned_len: align4(len),
            });
            cursor += align4(len);
        }

        for (index, (image, payload)) in descriptor
            .images
            .iter_mut()
            .zip(image_payloads)
            .enumerate()
        {
            let uri = image.uri.take();
            let Some(payload) = payload else {
                continue;
            };

            let len = payload.bytes.len();
            let view_index = descriptor.buffer_views.len();
            descriptor
                .buffer_views
                .push(BufferView::new(0, cursor as u64, len as u64));
            offsets.set(buffer_count + index, cursor);

            image.buffer_view = Some(view_index);
            image.mime_type = Some(match payload.media_type {
                Some(media_type) => media_type,
                None => mime_type_for(uri.as_deref().unwrap_or_default()).to_string(),
            });
            debug!(image = index, offset = cursor, len, view = view_index, "placed image");

            assets.push(ResolvedAsset {
                bytes: payload.bytes,
                offset: cursor,
                aligned_len: align4(len),
            });
            cursor += align4(len);
        }

        for (view_index, view) in descriptor.buffer_views[..original_view_count]
            .iter_mut()
            .enumerate()
        {
            let base = offsets.buffer(view.buffer).ok_or_else(|| {
                ConvertError::Layout(format!(
                    "bufferView {view_index} references missing buffer {}",
                    view.buffer
                ))
            })?;
            let offset = view
                .byte_offset
                .unwrap_or(0)
                .checked_add(base as u64)
                .ok_or_else(|| {
                    ConvertError::Layout(format!("bufferView {view_index} offset overflows"))
                })?;
            view.byte_offset = Some(offset);
            view.buffer = 0;
        }

        descriptor.buffers = vec![Buffer {
            uri: None,
            byte_length: cursor as u64,
            other: Map::new(),
        }];

        Ok(Layout {
            assets,
            offsets,
            bin_length: cursor,
        })
    }

    /// Buffers are referenced by bufferViews, so one without bytes cannot be
    /// skipped regardless of policy.
    fn resolve_buffer(
        &self,
        index: usize,
        uri: Option<&str>,
    ) -> Result<Payload<'a>, ConvertError> {
        self.resolver
            .resolve(uri)?
            .ok_or_else(|| ConvertError::MissingAsset {
                owner: format!("buffer {index}"),
                uri: uri.unwrap_or("(none)").to_string(),
            })
    }

    fn resolve_image(
        &self,
        index: usize,
        uri: Option<&str>,
    ) -> Result<Option<Payload<'a>>, ConvertError> {
        let payload = self.resolver.resolve(uri)?;
        if let (None, Some(uri)) = (&payload, uri) {
            match self.options.missing_assets {
                MissingAssetPolicy::Skip => {
                    warn!(image = index, uri, "image file not found, skipping")
                }
                MissingAssetPolicy::Fail => {
                    return Err(ConvertError::MissingAsset {
                        owner: format!("image {index}"),
                        uri: uri.to_string(),
                    });
                }
            }
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FileRegistry;

    fn descriptor(json: &str) -> Descriptor {
        Descriptor::from_slice(json.as_bytes()).unwrap()
    }

    fn plan_with<'a>(
        registry: &'a FileRegistry,
        descriptor: &mut Descriptor,
        options: PackOptions,
    ) -> Result<Layout<'a>, ConvertError> {
        BufferLayoutPlanner::new(AssetResolver::new(registry), options).plan(descriptor)
    }

    #[test]
    fn test_align4_properties() {
        for n in 0..64 {
            let aligned = align4(n);
            assert_eq!(aligned % 4, 0);
            assert!(aligned >= n);
            assert!(aligned - n <= 3);
        }
        assert_eq!(align4(0), 0);
        assert_eq!(align4(5), 8);
        assert_eq!(align4(8), 8);
    }

    #[test]
    fn test_buffers_then_images_offsets() {
        let mut registry = FileRegistry::new();
        registry.put("b0.bin", vec![1; 5]);
        registry.put("b1.bin", vec![2; 6]);
        registry.put("i0.png", vec![3; 3]);
        let mut doc = descriptor(
            r#"{
                "buffers": [
                    {"uri": "b0.bin", "byteLength": 5},
                    {"uri": "b1.bin", "byteLength": 6}
                ],
                "bufferViews": [{"buffer": 1, "byteOffset": 2, "byteLength": 4}],
                "images": [{"uri": "i0.png"}]
            }"#,
        );

        let layout = plan_with(&registry, &mut doc, PackOptions::default()).unwrap();

        assert_eq!(layout.offsets.buffer(0), Some(0));
        assert_eq!(layout.offsets.buffer(1), Some(align4(5)));
        assert_eq!(layout.offsets.image(0), Some(align4(5) + align4(6)));
        assert_eq!(layout.offsets.get(2), layout.offsets.image(0));
        assert_eq!(layout.bin_length, 8 + 8 + 4);

        // Pre-existing view moved into the combined buffer
        assert_eq!(doc.buffer_views[0].buffer, 0);
        assert_eq!(doc.buffer_views[0].byte_offset, Some(8 + 2));

        // Synthesized view for the image
        let image = &doc.images[0];
        assert_eq!(image.uri, None);
        assert_eq!(image.buffer_view, Some(1));
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        assert_eq!(doc.buffer_views[1].byte_offset, Some(16));
        assert_eq!(doc.buffer_views[1].byte_length, 3);

        assert_eq!(doc.buffers.len(), 1);
        assert_eq!(doc.buffers[0].byte_length, 20);
        assert_eq!(doc.buffers[0].uri, None);
    }

    #[test]
    fn test_view_without_offset_is_based_on_its_buffer() {
        let mut registry = FileRegistry::new();
        registry.put("a.bin", vec![0; 4]);
        registry.put("b.bin", vec![0; 4]);
        let mut doc = descriptor(
            r#"{
                "buffers": [{"uri": "a.bin"}, {"uri": "b.bin"}],
                "bufferViews": [{"buffer": 1, "byteLength": 4}]
            }"#,
        );

        plan_with(&registry, &mut doc, PackOptions::default()).unwrap();
        assert_eq!(doc.buffer_views[0].byte_offset, Some(4));
    }

    #[test]
    fn test_missing_image_is_stripped_but_kept() {
        let registry = FileRegistry::new();
        let mut doc =
            descriptor(r#"{"buffers": [], "images": [{"uri": "gone.png", "name": "x"}]}"#);

        let layout = plan_with(&registry, &mut doc, PackOptions::default()).unwrap();

        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].uri, None);
        assert_eq!(doc.images[0].buffer_view, None);
        assert!(doc.buffer_views.is_empty());
        assert_eq!(layout.offsets.image(0), None);
        assert_eq!(layout.bin_length, 0);
    }

    #[test]
    fn test_missing_image_fails_when_strict() {
        let registry = FileRegistry::new();
        let mut doc = descriptor(r#"{"buffers": [], "images": [{"uri": "gone.png"}]}"#);
        let result = plan_with(&registry, &mut doc, PackOptions::strict());
        assert!(
            matches!(result, Err(ConvertError::MissingAsset { uri, .. }) if uri == "gone.png")
        );
    }

    #[test]
    fn test_missing_buffer_always_fails() {
        let registry = FileRegistry::new();
        let mut doc = descriptor(r#"{"buffers": [{"uri": "mesh.bin", "byteLength": 4}]}"#);
        let result = plan_with(&registry, &mut doc, PackOptions::default());
        assert!(
            matches!(result, Err(ConvertError::MissingAsset { owner, .. }) if owner == "buffer 0")
        );
    }

    #[test]
    fn test_view_on_unknown_buffer_is_a_layout_error() {
        let registry = FileRegistry::new();
        let mut doc =
            descriptor(r#"{"buffers": [], "bufferViews": [{"buffer": 3, "byteLength": 4}]}"#);
        let result = plan_with(&registry, &mut doc, PackOptions::default());
        assert!(matches!(result, Err(ConvertError::Layout(_))));
    }

    #[test]
    fn test_view_offset_overflow_is_a_layout_error() {
        let mut registry = FileRegistry::new();
        registry.put("a.bin", vec![0; 4]);
        registry.put("b.bin", vec![0; 4]);
        let mut doc = descriptor(
            r#"{
                "buffers": [{"uri": "a.bin"}, {"uri": "b.bin"}],
                "bufferViews": [{"buffer": 1, "byteOffset": 18446744073709551615}]
            }"#,
        );

        let result = plan_with(&registry, &mut doc, PackOptions::default());
        assert!(
            matches!(result, Err(ConvertError::Layout(ref msg)) if msg.contains("overflows")),
            "{result:?}"
        );
    }

    #[test]
    fn test_data_uri_media_type_wins_over_extension() {
        let registry = FileRegistry::new();
        let mut doc = descriptor(
            r#"{"buffers": [], "images": [{"uri": "data:image/jpeg;base64,/9j/"}]}"#,
        );
        plan_with(&registry, &mut doc, PackOptions::default()).unwrap();
        assert_eq!(doc.images[0].mime_type.as_deref(), Some("image/jpeg"));
    }
}
