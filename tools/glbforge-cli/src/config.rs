//! glbforge.toml parsing

use anyhow::{Context, Result};
use glbforge_core::PackOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "glbforge.toml";

#[derive(Debug, Default, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub pack: PackOptions,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    /// Directory for converted files. Default: next to the input folder
    pub dir: Option<PathBuf>,
}

impl ForgeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse glbforge.toml")
    }

    /// Load an explicit config, or `glbforge.toml` in the working directory
    /// if there is one
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbforge_core::{DuplicatePolicy, MissingAssetPolicy};

    #[test]
    fn test_config_empty() {
        let config = ForgeConfig::parse("").unwrap();
        assert_eq!(config.pack, PackOptions::default());
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn test_config_full() {
        let config = ForgeConfig::parse(
            r#"
[pack]
missing_assets = "fail"
duplicate_names = "last-wins"

[output]
dir = "converted"
"#,
        )
        .unwrap();

        assert_eq!(config.pack.missing_assets, MissingAssetPolicy::Fail);
        assert_eq!(config.pack.duplicate_names, DuplicatePolicy::LastWins);
        assert_eq!(config.output.dir, Some(PathBuf::from("converted")));
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        assert!(ForgeConfig::parse("[pack]\nmissing_assets = \"maybe\"\n").is_err());
    }
}
