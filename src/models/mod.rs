//! Data models for the Questrade API.
//!
//! - [`primitives`] - Identifier newtypes and the API environment
//! - [`enums`] - Candle intervals, tick direction, security types
//! - [`account`] - Accounts, positions and activities
//! - [`market_data`] - Symbols, quotes and candles

pub mod primitives;
pub mod enums;
pub mod account;
pub mod market_data;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use account::*;
pub use market_data::*;
