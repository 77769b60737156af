//! Upload command implementation.
//!
//! Finds the charm file to upload, pushes it to the Store and waits for
//! the Store to accept or reject the new revision.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tracing::info;

use charmcraft_store::Store;

use super::StoreArgs;

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// The path to the charm file to be uploaded
    #[arg(long)]
    pub charm_file: Option<PathBuf>,

    /// Seconds between two checks of the upload status
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_delay: u64,

    /// Give up waiting for the Store after this many seconds
    #[arg(long)]
    pub poll_timeout: Option<u64>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Deserialize)]
struct Metadata {
    name: String,
}

/// Runs the upload command.
///
/// # Errors
///
/// Returns an error if the charm cannot be found, the upload fails, or the
/// Store rejects the revision.
pub async fn run(args: &UploadArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let (name, path) = discover_charm(args.charm_file.as_deref(), &cwd)?;
    info!(name = %name, path = %path.display(), "Uploading charm");

    let mut config = args.store.config();
    config.poll.delay = Duration::from_secs(args.poll_delay);
    config.poll.timeout = args.poll_timeout.map(Duration::from_secs);

    let store = Store::new(config).context("Failed to create Store client")?;
    let outcome = store
        .upload(&name, &path)
        .await
        .context("Failed to upload charm")?;

    if outcome.ok {
        let revision = outcome
            .revision
            .map_or_else(|| "?".to_string(), |r| r.to_string());
        println!("Revision {revision} of '{name}' created");
        Ok(())
    } else {
        anyhow::bail!("Upload failed: got status '{}'", outcome.status)
    }
}

/// Resolves the charm name and file to upload.
///
/// Without an explicit file the name is read from `metadata.yaml` in
/// `project_dir` and the file is `<name>.charm` there. With a file, the
/// name is its stem.
fn discover_charm(charm_file: Option<&Path>, project_dir: &Path) -> Result<(String, PathBuf)> {
    let Some(charm_file) = charm_file else {
        let name = read_metadata_name(project_dir).ok_or_else(|| {
            anyhow::anyhow!(
                "Can't access name in 'metadata.yaml' file. The 'upload' command needs to be \
                 executed in a valid project's directory, or point to a charm file with \
                 the --charm-file option."
            )
        })?;

        let path = project_dir.join(format!("{name}.charm"));
        if std::fs::File::open(&path).is_err() {
            anyhow::bail!(
                "Can't access charm file {}. You can indicate a charm file with \
                 the --charm-file option.",
                path.display()
            );
        }
        return Ok((name, path));
    };

    let path = expand_home(charm_file);
    if std::fs::metadata(&path).is_err() {
        anyhow::bail!("Can't access the indicated charm file: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("The indicated charm is not a file: {}", path.display());
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("Can't get a charm name from {}", path.display()))?;
    Ok((name, path))
}

fn read_metadata_name(project_dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(project_dir.join("metadata.yaml")).ok()?;
    let metadata: Metadata = serde_yaml::from_str(&content).ok()?;
    Some(metadata.name)
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_from_metadata() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("metadata.yaml"),
            "name: my-charm\nsummary: test\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("my-charm.charm"), b"zip").unwrap();

        let (name, path) = discover_charm(None, dir.path()).unwrap();

        assert_eq!(name, "my-charm");
        assert_eq!(path, dir.path().join("my-charm.charm"));
    }

    #[test]
    fn test_discover_without_metadata() {
        let dir = TempDir::new().unwrap();
        let err = discover_charm(None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("metadata.yaml"));
    }

    #[test]
    fn test_discover_metadata_without_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "summary: test\n").unwrap();
        let err = discover_charm(None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("metadata.yaml"));
    }

    #[test]
    fn test_discover_metadata_but_no_charm_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: my-charm\n").unwrap();

        let err = discover_charm(None, dir.path()).unwrap_err();

        assert!(err.to_string().contains("my-charm.charm"));
        assert!(err.to_string().contains("--charm-file"));
    }

    #[test]
    fn test_discover_explicit_file() {
        let dir = TempDir::new().unwrap();
        let charm = dir.path().join("other-name.charm");
        std::fs::write(&charm, b"zip").unwrap();

        let (name, path) =
            discover_charm(Some(charm.as_path()), Path::new("/nonexistent")).unwrap();

        assert_eq!(name, "other-name");
        assert_eq!(path, charm);
    }

    #[test]
    fn test_discover_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let charm = dir.path().join("missing.charm");

        let err = discover_charm(Some(charm.as_path()), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Can't access the indicated charm file"));
    }

    #[test]
    fn test_discover_explicit_directory() {
        let dir = TempDir::new().unwrap();
        let err = discover_charm(Some(dir.path()), dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn test_expand_home() {
        let plain = Path::new("/tmp/x.charm");
        assert_eq!(expand_home(plain), PathBuf::from("/tmp/x.charm"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/x.charm")), home.join("x.charm"));
        }
    }
}
