mod auth;
mod cli;
mod error;
mod insights;
mod providers;
mod reliability;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting ciqos - CI build reliability");
    cli.execute().await?;

    Ok(())
}
