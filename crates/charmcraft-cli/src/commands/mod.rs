//! CLI commands and argument parsing.

pub mod list;
pub mod login;
pub mod logout;
pub mod register;
pub mod upload;
pub mod whoami;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use charmcraft_store::{Store, StoreConfig, DEFAULT_API_URL, DEFAULT_STORAGE_URL};

/// Charmcraft - publish charms to the Charm Store
#[derive(Parser)]
#[command(name = "charmcraft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Login to the Store
    Login(login::LoginArgs),

    /// Clear session credentials
    Logout(logout::LogoutArgs),

    /// Show your login information relevant to the Store
    Whoami(whoami::WhoamiArgs),

    /// Register a name in the Store
    Register(register::RegisterArgs),

    /// List the charms registered in the Store
    List(list::ListArgs),

    /// Upload a charm file to the Store
    Upload(upload::UploadArgs),

    /// Print version information
    Version,
}

/// Store connection options shared by all commands.
#[derive(Args, Clone)]
pub struct StoreArgs {
    /// Store API URL
    #[arg(long, env = "CHARMCRAFT_STORE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Storage URL receiving charm files
    #[arg(long, env = "CHARMCRAFT_STORE_STORAGE_URL", default_value = DEFAULT_STORAGE_URL)]
    pub storage_url: String,

    /// Credential file location
    #[arg(long, env = "CHARMCRAFT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl StoreArgs {
    /// Builds the Store configuration from the options.
    pub fn config(&self) -> StoreConfig {
        let mut config = StoreConfig::new(&self.api_url, &self.storage_url)
            .with_timeout(Duration::from_secs(self.timeout));

        if let Some(ref path) = self.credentials {
            config = config.with_credentials_path(path);
        }

        config
    }

    /// Creates a Store client from the options.
    pub fn store(&self) -> Result<Store> {
        Store::new(self.config()).context("Failed to create Store client")
    }
}

/// Output format for commands printing data.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Left-aligns rows into columns separated by two spaces.
pub fn format_table(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}
