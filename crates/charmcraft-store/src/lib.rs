//! # Charmcraft Store
//!
//! Client for the Charm Store: authentication, charm name registration,
//! listing and charm uploads.
//!
//! ## Features
//!
//! - **Pluggable transport**: the [`Store`] façade works over any [`Transport`]
//! - **Credential storage**: file-backed token kept out of the façade's reach
//! - **Upload tracking**: polls the Store until the upload job ends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use charmcraft_store::{Store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::new(StoreConfig::default())?;
//!
//!     let me = store.whoami().await?;
//!     println!("logged in as {}", me.username);
//!
//!     let outcome = store.upload("my-charm", Path::new("my-charm.charm")).await?;
//!     if outcome.ok {
//!         println!("revision {:?} created", outcome.revision);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                               │
//! │  login / logout / whoami / register / list / upload         │
//! └─────────────────────────────────────────────────────────────┘
//!                          │ Transport
//!                          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HttpTransport                            │
//! │  ┌─────────────┐  ┌──────────────────┐                      │
//! │  │  reqwest    │  │ CredentialStore  │                      │
//! │  └─────────────┘  └──────────────────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!            Store API  +  storage service
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod credentials;
mod error;
mod http;
mod store;
mod transport;
mod upload;
mod wire;

#[cfg(test)]
mod mock;

pub use config::{
    EndingStatuses, PollConfig, StoreConfig, DEFAULT_API_URL, DEFAULT_STORAGE_URL,
};
pub use credentials::CredentialStore;
pub use error::StoreError;
pub use http::HttpTransport;
pub use store::{Identity, RegisteredCharm, Store};
pub use transport::Transport;
pub use upload::{UploadJob, UploadOutcome};
