//! stencil CLI entrypoint
//! Parses command-line arguments and runs the site build.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use stencil::Site;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every locale page and copy static assets
    Build {
        /// Directory holding templates, locale data and public assets
        #[arg(long, default_value = "src")]
        src: PathBuf,
        /// Directory the generated site is written to
        #[arg(long, default_value = "dist")]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build { src, out } => {
            if let Err(e) = Site::new(src, out).build() {
                error!("build failed: {}", e);
                process::exit(1);
            }
        }
    }
}
