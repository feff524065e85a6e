pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "spacetraveling")]
#[command(about = "Blog front end for a headless CMS", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/spacetraveling/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List posts, loading more pages on demand
    Posts {
        /// Seed file written by regeneration, or the URL of the first page
        source: String,

        /// Number of additional pages to load
        #[arg(short, long, default_value_t = 0)]
        pages: usize,

        /// Keep loading until the last page
        #[arg(long, conflicts_with = "pages")]
        all: bool,
    },
    /// Show a single post
    Post {
        /// JSON file holding one CMS document
        path: PathBuf,

        /// Render as a preview of the given CMS reference
        #[arg(long)]
        preview_ref: Option<String>,
    },
}
