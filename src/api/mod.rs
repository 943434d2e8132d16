//! API service modules for Questrade endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the Questrade API.

use chrono::NaiveDate;

mod accounts;
mod market_data;

pub use accounts::AccountsService;
pub use market_data::MarketDataService;

/// Start of a trading day as the API expects it in time-window queries.
pub(crate) fn market_day_start(date: NaiveDate) -> String {
    format!("{}T00:00:00-05:00", date.format("%Y-%m-%d"))
}
