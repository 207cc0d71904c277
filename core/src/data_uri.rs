//! `data:` URI decoding
//!
//! Format: `data:[<mediatype>][;base64],<data>`

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::ConvertError;

/// Standard alphabet, padding optional (exporters disagree on it)
const DATA_URI_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}

/// A parsed `data:` URI borrowing from the source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub media_type: Option<&'a str>,
    pub base64: bool,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    pub fn parse(uri: &'a str) -> Result<Self, ConvertError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ConvertError::InvalidDataUri("missing data: scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ConvertError::InvalidDataUri("no comma before payload".to_string()))?;

        let (header, base64) = match header.strip_suffix(";base64") {
            Some(h) => (h, true),
            None => (header, false),
        };
        // Drop parameters such as ";charset=utf-8"
        let media_type = header.split(';').next().filter(|m| !m.is_empty());

        Ok(Self {
            media_type,
            base64,
            payload,
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, ConvertError> {
        if self.base64 {
            let payload: String = self
                .payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            DATA_URI_BASE64
                .decode(payload)
                .map_err(|e| ConvertError::InvalidDataUri(e.to_string()))
        } else {
            Ok(percent_decode(self.payload))
        }
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let high = (bytes[i + 1] as char).to_digit(16);
            let low = (bytes[i + 2] as char).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                out.push((high * 16 + low) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
