//! Pack command - convert glTF folders into one .glb

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};

use glbforge_core::{
    AssetSink, Converter, DirectorySink, EnglishTranslator, LocalFs, Outcome, PackOptions,
};

use crate::config::ForgeConfig;

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// Folders to pack (together they must hold exactly one .gltf file)
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,

    /// Output directory (overrides config). Default: next to the first folder
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config file (default: ./glbforge.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fail on missing images and duplicate file names
    #[arg(long)]
    pub strict: bool,
}

/// Execute the pack command
pub fn execute(args: PackArgs) -> Result<()> {
    let config = ForgeConfig::discover(args.config.as_deref())?;
    let options = if args.strict {
        PackOptions::strict()
    } else {
        config.pack
    };
    let output_dir = args
        .output
        .or(config.output.dir)
        .unwrap_or_else(|| default_output_dir(&args.folders[0]));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")?;

    rt.block_on(pack(&args.folders, options, &output_dir))
}

async fn pack(folders: &[PathBuf], options: PackOptions, output_dir: &Path) -> Result<()> {
    let mut items = Vec::with_capacity(folders.len());
    for folder in folders {
        let entry = LocalFs::entry(folder)
            .await
            .with_context(|| format!("Failed to open {}", folder.display()))?;
        items.push(entry);
    }

    println!("Packing: {}", display_list(folders));

    let converter = Converter::with_options(LocalFs, options);
    let mut outcome = None;
    converter
        .convert_with(&items, &EnglishTranslator, |result| outcome = Some(result))
        .await;

    let file = match outcome {
        Some(Outcome::File(file)) => file,
        Some(Outcome::Error(message)) => bail!(message),
        None => bail!("Conversion finished without a result"),
    };

    let size = file.bytes.len();
    let mut sink = DirectorySink::new(output_dir);
    sink.accept(file)
        .with_context(|| format!("Failed to write into {}", output_dir.display()))?;
    for path in sink.written() {
        println!("  GLB: {} ({} bytes)", path.display(), size);
    }

    Ok(())
}

/// Parent of the input folder, so `models/robot` packs into `models/`
fn default_output_dir(folder: &Path) -> PathBuf {
    match folder.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn display_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("models/robot")),
            PathBuf::from("models")
        );
        assert_eq!(default_output_dir(Path::new("robot")), PathBuf::from("."));
    }
}
