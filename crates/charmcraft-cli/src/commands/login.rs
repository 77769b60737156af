//! Login command implementation.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use charmcraft_store::Store;

use super::StoreArgs;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Store token to authenticate with (prompted for when absent)
    #[arg(long, env = "CHARMCRAFT_AUTH", hide_env_values = true)]
    pub token: Option<String>,
}

/// Runs the login command.
///
/// # Errors
///
/// Returns an error if no token is available or the Store rejects it.
pub async fn run(args: &LoginArgs) -> Result<()> {
    info!(api_url = %args.store.api_url, "Logging into the Store");

    let token = match args.token {
        Some(ref token) => token.clone(),
        None => prompt_token(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let config = args.store.config().with_login_token(token);
    let store = Store::new(config).context("Failed to create Store client")?;

    store.login().await.context("Login failed")?;
    println!("Login successful");
    Ok(())
}

/// Asks for a token on `output` and reads it from `input`.
fn prompt_token(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "Store token: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let token = line.trim();
    if token.is_empty() {
        anyhow::bail!("A token is required to login (use --token or CHARMCRAFT_AUTH)");
    }
    Ok(token.to_string())
}
