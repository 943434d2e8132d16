//! Symbol, quote and candle models.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Currency, SecurityType, TickType};
use super::primitives::SymbolId;

/// Reference data for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Ticker symbol
    pub symbol: String,
    /// Internal symbol ID
    pub symbol_id: SymbolId,
    /// Company or instrument description
    #[serde(default)]
    pub description: String,
    /// Kind of security
    #[serde(default)]
    pub security_type: SecurityType,
    /// Primary listing exchange
    #[serde(default)]
    pub listing_exchange: Option<String>,
    /// Listing currency
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Previous day closing price
    #[serde(default)]
    pub prev_day_close_price: Option<Decimal>,
    /// 52-week high
    #[serde(default)]
    pub high_price52: Option<Decimal>,
    /// 52-week low
    #[serde(default)]
    pub low_price52: Option<Decimal>,
    /// Average daily volume over the last three months
    #[serde(default)]
    pub average_vol3_months: Option<u64>,
    /// Average daily volume over the last twenty days
    #[serde(default)]
    pub average_vol20_days: Option<u64>,
    /// Shares outstanding
    #[serde(default)]
    pub outstanding_shares: Option<u64>,
    /// Earnings per share
    #[serde(default)]
    pub eps: Option<Decimal>,
    /// Price to earnings ratio
    #[serde(default)]
    pub pe: Option<Decimal>,
    /// Dividend amount per share
    #[serde(default)]
    pub dividend: Option<Decimal>,
    /// Dividend yield
    #[serde(rename = "yield", default)]
    pub dividend_yield: Option<Decimal>,
    /// Ex-dividend date
    #[serde(default)]
    pub ex_date: Option<DateTime<FixedOffset>>,
    /// Dividend payment date
    #[serde(default)]
    pub dividend_date: Option<DateTime<FixedOffset>>,
    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// Number of units per trade
    #[serde(default)]
    pub trade_unit: Option<u64>,
    /// Industry sector
    #[serde(default)]
    pub industry_sector: Option<String>,
    /// Industry group
    #[serde(default)]
    pub industry_group: Option<String>,
    /// Industry subgroup
    #[serde(default)]
    pub industry_subgroup: Option<String>,
    /// Option type, for option symbols
    #[serde(default)]
    pub option_type: Option<String>,
    /// Option expiry, for option symbols
    #[serde(default)]
    pub option_expiry_date: Option<DateTime<FixedOffset>>,
    /// Option strike price, for option symbols
    #[serde(default)]
    pub option_strike_price: Option<Decimal>,
    /// Whether options are listed on this symbol
    #[serde(default)]
    pub has_options: bool,
    /// Whether the symbol can be traded
    #[serde(default)]
    pub is_tradable: bool,
    /// Whether quotes are available
    #[serde(default)]
    pub is_quotable: bool,
}

/// Level 1 market data snapshot for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol
    pub symbol: String,
    /// Internal symbol ID
    pub symbol_id: SymbolId,
    /// Market tier
    #[serde(default)]
    pub tier: String,
    /// Best bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Shares at the best bid
    #[serde(default)]
    pub bid_size: u64,
    /// Best ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Shares at the best ask
    #[serde(default)]
    pub ask_size: u64,
    /// Last price during regular trading hours
    #[serde(default)]
    pub last_trade_price_tr_hrs: Option<Decimal>,
    /// Last traded price
    #[serde(default)]
    pub last_trade_price: Option<Decimal>,
    /// Size of the last trade
    #[serde(default)]
    pub last_trade_size: u64,
    /// Direction of the last trade
    #[serde(default)]
    pub last_trade_tick: Option<TickType>,
    /// Time of the last trade
    #[serde(default)]
    pub last_trade_time: Option<DateTime<FixedOffset>>,
    /// Volume traded today
    #[serde(default)]
    pub volume: u64,
    /// Opening price
    #[serde(default)]
    pub open_price: Option<Decimal>,
    /// Daily high
    #[serde(default)]
    pub high_price: Option<Decimal>,
    /// Daily low
    #[serde(default)]
    pub low_price: Option<Decimal>,
    /// Quote delay in minutes, zero for real-time
    #[serde(default)]
    pub delay: u32,
    /// Whether trading is halted
    #[serde(default)]
    pub is_halted: bool,
    /// 52-week high
    #[serde(default)]
    pub high52w: Option<Decimal>,
    /// 52-week low
    #[serde(default)]
    pub low52w: Option<Decimal>,
    /// Volume-weighted average price
    #[serde(rename = "VWAP", default)]
    pub vwap: Option<Decimal>,
}

impl Quote {
    /// Midpoint of bid and ask, when both are present.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid_price, self.ask_price) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}

/// One bar of historical market data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Start of the bar
    pub start: DateTime<FixedOffset>,
    /// End of the bar
    pub end: DateTime<FixedOffset>,
    /// Opening price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Volume traded during the bar
    #[serde(default)]
    pub volume: u64,
    /// Volume-weighted average price
    #[serde(rename = "VWAP", default)]
    pub vwap: Option<Decimal>,
}
