//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use charmcraft_store::Identity;

use super::{format_table, OutputFormat, StoreArgs};

/// Arguments for the whoami command.
#[derive(Args)]
pub struct WhoamiArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Runs the whoami command.
pub async fn run(args: &WhoamiArgs) -> Result<()> {
    info!(api_url = %args.store.api_url, "Checking login information");

    let store = args.store.store()?;
    let identity = store
        .whoami()
        .await
        .context("Failed to get login information")?;

    match args.format {
        OutputFormat::Text => {
            for line in text_lines(&identity) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&identity)?),
    }

    Ok(())
}

fn text_lines(identity: &Identity) -> Vec<String> {
    format_table(&[
        vec!["name:".to_string(), identity.name.clone()],
        vec!["username:".to_string(), identity.username.clone()],
        vec!["id:".to_string(), identity.userid.clone()],
    ])
}
