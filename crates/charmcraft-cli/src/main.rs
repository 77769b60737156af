//! Charmcraft CLI - publish charms to the Charm Store.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "charmcraft=debug,charmcraft_store=debug"
    } else {
        "charmcraft=info,charmcraft_store=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Login(args) => commands::login::run(&args).await,
        Commands::Logout(args) => commands::logout::run(&args),
        Commands::Whoami(args) => commands::whoami::run(&args).await,
        Commands::Register(args) => commands::register::run(&args).await,
        Commands::List(args) => commands::list::run(&args).await,
        Commands::Upload(args) => commands::upload::run(&args).await,
        Commands::Version => {
            println!("charmcraft {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
