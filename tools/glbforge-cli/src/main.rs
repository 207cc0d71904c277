//! glbforge - pack glTF folders into GLB files
//!
//! # Commands
//!
//! - `glbforge pack <folder>...` - Convert a folder holding a separate glTF
//!   asset (`.gltf` + `.bin` + images) into one `.glb`
//! - `glbforge check <file>` - Tell whether a `.gltf`/`.glb` file can be used
//!   as-is or needs converting
//!
//! # Configuration (glbforge.toml)
//!
//! ```toml
//! [pack]
//! missing_assets = "fail"      # or "skip" (default)
//! duplicate_names = "fail"     # or "last-wins" (default)
//!
//! [output]
//! dir = "converted"
//! ```

mod check;
mod config;
mod pack;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// glbforge - pack glTF folders into GLB files
#[derive(Parser)]
#[command(name = "glbforge")]
#[command(about = "Pack glTF folders into self-contained GLB files")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert dropped glTF folders into a GLB file
    Pack(pack::PackArgs),

    /// Check whether a model file needs converting
    Check(check::CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Pack(args) => pack::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}
