//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::StoreArgs;

/// Arguments for the logout command.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Runs the logout command.
pub fn run(args: &LogoutArgs) -> Result<()> {
    let store = args.store.store()?;
    info!(path = %store.transport().credentials().path().display(), "Clearing credentials");
    store.logout().context("Failed to clear credentials")?;
    println!("Credentials cleared");
    Ok(())
}
