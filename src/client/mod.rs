//! HTTP client and service layer for the Questrade API.
//!
//! This module provides the main entry point [`QuestradeClient`] for
//! interacting with the Questrade API.
//!
//! # Example
//!
//! ```no_run
//! use questrade_rs::{ClientConfig, QuestradeClient};
//!
//! # async fn example() -> questrade_rs::Result<()> {
//! let client = QuestradeClient::from_access_code(
//!     "your-access-code",
//!     None,
//!     ClientConfig::default(),
//! ).await?;
//!
//! let accounts = client.accounts().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::ClientConfig;
pub use http::QuestradeClient;
pub(crate) use http::ClientInner;
