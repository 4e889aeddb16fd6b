use anyhow::Result;
use clap::Parser;
use stylebot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, polling } => {
            let config = load_config(token)?;
            run_bot(config, polling).await
        }
    }
}
