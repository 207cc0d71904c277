//! Conversion policies

use serde::Deserialize;

/// What to do with an image whose URI resolves to no file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingAssetPolicy {
    /// Strip the URI and leave the image without data (with a warning)
    #[default]
    Skip,
    /// Abort the conversion
    Fail,
}

/// What to do when two dropped files share a base name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep whichever file finished reading last (with a warning)
    #[default]
    LastWins,
    /// Abort the conversion
    Fail,
}

/// Options for a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    pub missing_assets: MissingAssetPolicy,
    pub duplicate_names: DuplicatePolicy,
}

impl PackOptions {
    /// Fail on anything that would otherwise be silently dropped
    pub fn strict() -> Self {
        Self {
            missing_assets: MissingAssetPolicy::Fail,
            duplicate_names: DuplicatePolicy::Fail,
        }
    }
}
