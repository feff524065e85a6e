use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spacetraveling::app::AppContext;
use spacetraveling::cli::commands::{self, PageBudget};
use spacetraveling::cli::{Cli, Commands};
use spacetraveling::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Posts { source, pages, all } => {
            let budget = if all {
                PageBudget::All
            } else {
                PageBudget::Pages(pages)
            };
            commands::list_posts(&ctx, &source, budget).await?;
        }
        Commands::Post { path, preview_ref } => {
            commands::show_post(&ctx, &path, preview_ref)?;
        }
    }

    Ok(())
}
