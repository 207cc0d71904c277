//! Check command - can a model file be used without converting?

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;

use glbforge_core::{AssetKind, EnglishTranslator, Translator, classify};

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// .gltf or .glb file to check
    pub file: PathBuf,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let name = args.file.to_string_lossy();
    let kind = classify(&name, &bytes);

    match &kind {
        AssetKind::Glb => println!("{name}: GLB, ready to use"),
        AssetKind::EmbeddedGltf => println!("{name}: glTF with embedded assets, ready to use"),
        AssetKind::SeparateGltf(external) => {
            println!("{name}: glTF referencing external files:");
            for uri in external {
                println!("  {uri}");
            }
            println!("Pack its folder with `glbforge pack <folder>`.");
        }
        AssetKind::Damaged(reason) => println!("{name}: unreadable ({reason})"),
        AssetKind::Unsupported(ext) => println!("{name}: unsupported extension {ext:?}"),
    }

    if let Some(key) = kind.message_key() {
        bail!("{}", EnglishTranslator.translate(key));
    }
    Ok(())
}
