//! GLB container writing and reading
//!
//! Layout (all fields little-endian u32):
//!
//! ```text
//! 0       magic "glTF"
//! 4       version (2)
//! 8       total length
//! 12      JSON chunk length, "JSON", JSON padded with spaces
//! 20+L    BIN chunk length, "BIN\0", payloads at their planned offsets
//! ```

use crate::descriptor::Descriptor;
use crate::error::ConvertError;
use crate::layout::{Layout, align4};

pub const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
pub const CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"
pub const HEADER_LEN: usize = 12;
pub const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlbError {
    #[error("file is {0} bytes, too short for a GLB header")]
    Truncated(usize),

    #[error("bad magic 0x{0:08X}")]
    BadMagic(u32),

    #[error("unsupported GLB version {0}")]
    UnsupportedVersion(u32),

    #[error("header declares {declared} bytes but file has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("expected chunk type 0x{expected:08X}, found 0x{found:08X}")]
    UnexpectedChunk { expected: u32, found: u32 },

    #[error("chunk of {len} bytes at offset {offset} overruns the file")]
    ChunkOverrun { offset: usize, len: usize },

    #[error("chunk length {0} is not a multiple of 4")]
    UnalignedChunk(usize),

    #[error("output of {0} bytes exceeds the 4 GiB GLB limit")]
    TooLarge(usize),
}

/// Render the final GLB from a rewritten descriptor and its layout
pub fn write_glb(descriptor: &Descriptor, layout: &Layout<'_>) -> Result<Vec<u8>, ConvertError> {
    let json = descriptor.to_vec()?;
    let json_chunk_len = align4(json.len());
    let packed: usize = layout.assets.iter().map(|asset| asset.aligned_len).sum();
    if packed != layout.bin_length {
        return Err(ConvertError::Layout(format!(
            "payloads occupy {packed} bytes but the buffer declares {}",
            layout.bin_length
        )));
    }
    // Already aligned: every slot advances the cursor by an aligned length
    let bin_chunk_len = align4(layout.bin_length);

    let total_len =
        HEADER_LEN + CHUNK_HEADER_LEN + json_chunk_len + CHUNK_HEADER_LEN + bin_chunk_len;
    let total_u32 = u32::try_from(total_len).map_err(|_| GlbError::TooLarge(total_len))?;

    let mut glb = Vec::with_capacity(total_len);

    // Header
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_u32.to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json);
    glb.extend(std::iter::repeat_n(0x20u8, json_chunk_len - json.len()));

    // BIN chunk, zero-filled so alignment gaps are deterministic
    glb.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    let bin_start = glb.len();
    glb.resize(bin_start + bin_chunk_len, 0);
    for asset in &layout.assets {
        let start = bin_start + asset.offset;
        let end = start + asset.bytes.len();
        if end > glb.len() {
            return Err(ConvertError::Layout(format!(
                "payload at offset {} ({} bytes) exceeds the {bin_chunk_len}-byte buffer",
                asset.offset,
                asset.bytes.len()
            )));
        }
        glb[start..end].copy_from_slice(&asset.bytes);
    }

    debug_assert_eq!(glb.len(), total_len);
    Ok(glb)
}

/// Read-only view of a GLB file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbContainer<'a> {
    pub version: u32,
    pub length: usize,
    pub json: &'a [u8],
    pub bin: Option<&'a [u8]>,
}

impl<'a> GlbContainer<'a> {
    /// Parse and validate header and chunk headers. The JSON is not parsed.
    pub fn parse(data: &'a [u8]) -> Result<Self, GlbError> {
        if data.len() < HEADER_LEN + CHUNK_HEADER_LEN {
            return Err(GlbError::Truncated(data.len()));
        }

        let magic = read_u32(data, 0);
        if magic != GLB_MAGIC {
            return Err(GlbError::BadMagic(magic));
        }
        let version = read_u32(data, 4);
        if version != GLB_VERSION {
            return Err(GlbError::UnsupportedVersion(version));
        }
        let length = read_u32(data, 8) as usize;
        if length != data.len() {
            return Err(GlbError::LengthMismatch {
                declared: length,
                actual: data.len(),
            });
        }

        let (json, next) = read_chunk(data, HEADER_LEN, CHUNK_JSON)?;
        let bin = if next < data.len() {
            Some(read_chunk(data, next, CHUNK_BIN)?.0)
        } else {
            None
        };

        Ok(Self {
            version,
            length,
            json,
            bin,
        })
    }

    /// Byte offset of the BIN chunk body within the file
    pub fn bin_offset(&self) -> Option<usize> {
        self.bin
            .map(|_| HEADER_LEN + CHUNK_HEADER_LEN + self.json.len() + CHUNK_HEADER_LEN)
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Returns the chunk body and the offset just past it
fn read_chunk(data: &[u8], offset: usize, expected: u32) -> Result<(&[u8], usize), GlbError> {
    if offset + CHUNK_HEADER_LEN > data.len() {
        return Err(GlbError::ChunkOverrun { offset, len: 0 });
    }
    let len = read_u32(data, offset) as usize;
    let found = read_u32(data, offset + 4);
    if found != expected {
        return Err(GlbError::UnexpectedChunk { expected, found });
    }
    if len % 4 != 0 {
        return Err(GlbError::UnalignedChunk(len));
    }
    let start = offset + CHUNK_HEADER_LEN;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or(GlbError::ChunkOverrun { offset, len })?;
    Ok((&data[start..end], end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{OffsetTable, ResolvedAsset};
    use std::borrow::Cow;

    fn layout_of(payloads: &[&'static [u8]]) -> Layout<'static> {
        let mut assets = Vec::new();
        let mut cursor = 0;
        for bytes in payloads {
            assets.push(ResolvedAsset {
                bytes: Cow::Borrowed(*bytes),
                offset: cursor,
                aligned_len: align4(bytes.len()),
            });
            cursor += align4(bytes.len());
        }
        Layout {
            assets,
            offsets: OffsetTable::default(),
            bin_length: cursor,
        }
    }

    #[test]
    fn test_total_length_and_padding() {
        let descriptor = Descriptor::from_slice(br#"{"asset":{"version":"2.0"}}"#).unwrap();
        let json_len = descriptor.to_vec().unwrap().len();
        let layout = layout_of(&[&[1, 2, 3], &[4, 5, 6, 7, 8]]);

        let glb = write_glb(&descriptor, &layout).unwrap();

        assert_eq!(glb.len(), 12 + 8 + align4(json_len) + 8 + 12);
        assert_eq!(read_u32(&glb, 0), GLB_MAGIC);
        assert_eq!(read_u32(&glb, 4), 2);
        assert_eq!(read_u32(&glb, 8) as usize, glb.len());
        assert_eq!(read_u32(&glb, 12) as usize % 4, 0);
        // JSON padding is spaces
        assert!(glb[20 + json_len..20 + align4(json_len)].iter().all(|b| *b == 0x20));

        let container = GlbContainer::parse(&glb).unwrap();
        assert_eq!(container.bin, Some(&[1, 2, 3, 0, 4, 5, 6, 7, 8, 0, 0, 0][..]));
        assert_eq!(container.bin_offset(), Some(20 + align4(json_len) + 8));
    }

    #[test]
    fn test_empty_bin_chunk_is_written() {
        let descriptor = Descriptor::default();
        let glb = write_glb(&descriptor, &layout_of(&[])).unwrap();
        let container = GlbContainer::parse(&glb).unwrap();
        assert_eq!(container.bin, Some(&[][..]));
    }

    #[test]
    fn test_layout_length_mismatch_is_rejected() {
        let mut layout = layout_of(&[&[1, 2, 3]]);
        layout.bin_length = 8;
        let result = write_glb(&Descriptor::default(), &layout);
        assert!(matches!(result, Err(ConvertError::Layout(_))));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(GlbContainer::parse(b"glTF"), Err(GlbError::Truncated(4)));

        let descriptor = Descriptor::default();
        let mut glb = write_glb(&descriptor, &layout_of(&[b"abcd"])).unwrap();

        let mut bad_magic = glb.clone();
        bad_magic[0] = b'x';
        assert!(matches!(GlbContainer::parse(&bad_magic), Err(GlbError::BadMagic(_))));

        let mut bad_version = glb.clone();
        bad_version[4] = 1;
        assert_eq!(
            GlbContainer::parse(&bad_version),
            Err(GlbError::UnsupportedVersion(1))
        );

        glb.push(0);
        assert!(matches!(
            GlbContainer::parse(&glb),
            Err(GlbError::LengthMismatch { .. })
        ));
    }
}
