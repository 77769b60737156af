//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::StoreArgs;

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// The name to register in the Store
    pub name: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Runs the register command.
pub async fn run(args: &RegisterArgs) -> Result<()> {
    info!(name = %args.name, "Registering name");

    let store = args.store.store()?;
    store
        .register_name(&args.name)
        .await
        .with_context(|| format!("Failed to register '{}'", args.name))?;

    println!("Congrats! You are now the publisher of '{}'", args.name);
    Ok(())
}
