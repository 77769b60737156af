//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use charmcraft_store::RegisteredCharm;

use super::{format_table, OutputFormat, StoreArgs};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Runs the list command.
pub async fn run(args: &ListArgs) -> Result<()> {
    info!(api_url = %args.store.api_url, "Listing registered names");

    let store = args.store.store()?;
    let charms = store
        .list_registered_names()
        .await
        .context("Failed to list registered names")?;

    match args.format {
        OutputFormat::Text => {
            for line in text_lines(&charms) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&charms)?),
    }

    Ok(())
}

fn text_lines(charms: &[RegisteredCharm]) -> Vec<String> {
    if charms.is_empty() {
        return vec!["Nothing found".to_string()];
    }

    let mut rows = vec![vec![
        "Name".to_string(),
        "Visibility".to_string(),
        "Status".to_string(),
    ]];
    rows.extend(charms.iter().map(|charm| {
        let visibility = if charm.private { "private" } else { "public" };
        vec![
            charm.name.clone(),
            visibility.to_string(),
            charm.status.clone(),
        ]
    }));

    format_table(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_empty() {
        assert_eq!(text_lines(&[]), vec!["Nothing found"]);
    }

    #[test]
    fn test_text_lines_visibility() {
        let charms = vec![
            RegisteredCharm {
                name: "name1".to_string(),
                private: false,
                status: "status1".to_string(),
            },
            RegisteredCharm {
                name: "name2".to_string(),
                private: true,
                status: "status2".to_string(),
            },
        ];

        assert_eq!(
            text_lines(&charms),
            vec![
                "Name   Visibility  Status",
                "name1  public      status1",
                "name2  private     status2",
            ]
        );
    }
}
