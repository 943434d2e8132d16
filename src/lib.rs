//! # questrade-rs
//!
//! A Rust client for the Questrade brokerage API.
//!
//! The heart of the crate is the OAuth token lifecycle: exchanging a one-time
//! access code for a credential, persisting it, refreshing it with its
//! single-use refresh token, and attaching it to every request. On top of
//! that sit typed services for accounts, positions, activities, symbols,
//! quotes and historical candles.
//!
//! ## Features
//!
//! - **Authentication**: access-code and refresh-token exchange with
//!   validated, normalized credentials
//! - **Persistence**: YAML credential records on disk or in memory
//! - **Account Data**: accounts, positions and activity history
//! - **Market Data**: symbol lookups, quotes and candles
//! - **Type Safety**: strongly-typed models with decimal prices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use questrade_rs::{ClientConfig, QuestradeClient};
//! use questrade_rs::auth::{CredentialStore, RefreshSource, YamlFileStore};
//!
//! #[tokio::main]
//! async fn main() -> questrade_rs::Result<()> {
//!     let store: Arc<dyn CredentialStore> = Arc::new(YamlFileStore::new("access_token.yml"));
//!
//!     // First run: exchange the access code and save the credential
//!     let client = QuestradeClient::connect(
//!         std::env::args().nth(1).as_deref(),
//!         Some(store.clone()),
//!         ClientConfig::default(),
//!     ).await?;
//!
//!     let accounts = client.accounts().numbers().await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     // Later: mint a new token and write it back
//!     client.refresh_session(RefreshSource::Store(store.as_ref())).await?;
//!
//!     let quote = client.market_data().quote("XYZ").await?;
//!     println!("XYZ last: {:?}", quote.last_trade_price);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Raw Requests
//!
//! Endpoints without a typed wrapper can be called through the session:
//!
//! ```rust,no_run
//! use reqwest::Method;
//!
//! # async fn example(client: questrade_rs::QuestradeClient) -> questrade_rs::Result<()> {
//! let time = client.session().dispatch(Method::GET, "time", &[], None).await?;
//! println!("Server time: {}", time["time"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credential, Session};
pub use client::{ClientConfig, QuestradeClient};
pub use error::{Error, Result};
pub use models::{AccountNumber, Environment, SymbolId};

/// Prelude module for convenient imports.
///
/// ```rust
/// use questrade_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{
        Credential, CredentialStore, MemoryStore, RefreshSource, Session, SessionStatus,
        YamlFileStore,
    };
    pub use crate::client::{ClientConfig, QuestradeClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        AccountNumber, Environment, SymbolId,
        // Enums
        CandleInterval, Currency, SecurityType, TickType,
        // Account models
        Account, Activity, Position,
        // Market data models
        Candle, Quote, SymbolInfo,
    };
}
