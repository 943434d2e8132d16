//! Enumeration types for the Questrade API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar width for historical candle requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    /// One-minute candles
    OneMinute,
    /// Two-minute candles
    TwoMinutes,
    /// Three-minute candles
    ThreeMinutes,
    /// Four-minute candles
    FourMinutes,
    /// Five-minute candles
    FiveMinutes,
    /// Ten-minute candles
    TenMinutes,
    /// Fifteen-minute candles
    FifteenMinutes,
    /// Twenty-minute candles
    TwentyMinutes,
    /// Thirty-minute candles
    HalfHour,
    /// One-hour candles
    OneHour,
    /// Two-hour candles
    TwoHours,
    /// Four-hour candles
    FourHours,
    /// Daily candles
    OneDay,
    /// Weekly candles
    OneWeek,
    /// Monthly candles
    OneMonth,
    /// Yearly candles
    OneYear,
}

impl CandleInterval {
    /// The value sent in the `interval` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "OneMinute",
            CandleInterval::TwoMinutes => "TwoMinutes",
            CandleInterval::ThreeMinutes => "ThreeMinutes",
            CandleInterval::FourMinutes => "FourMinutes",
            CandleInterval::FiveMinutes => "FiveMinutes",
            CandleInterval::TenMinutes => "TenMinutes",
            CandleInterval::FifteenMinutes => "FifteenMinutes",
            CandleInterval::TwentyMinutes => "TwentyMinutes",
            CandleInterval::HalfHour => "HalfHour",
            CandleInterval::OneHour => "OneHour",
            CandleInterval::TwoHours => "TwoHours",
            CandleInterval::FourHours => "FourHours",
            CandleInterval::OneDay => "OneDay",
            CandleInterval::OneWeek => "OneWeek",
            CandleInterval::OneMonth => "OneMonth",
            CandleInterval::OneYear => "OneYear",
        }
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the last trade relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickType {
    /// Traded above the previous price
    Up,
    /// Traded below the previous price
    Down,
    /// Traded at the previous price
    Equal,
}

/// Kind of security a symbol refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SecurityType {
    /// Common and preferred equities, ETFs, ETNs, units, ADRs
    #[default]
    Stock,
    /// Equity and index options
    Option,
    /// Debentures, notes, bonds
    Bond,
    /// Equity or bond rights and warrants
    Right,
    /// Physical gold
    Gold,
    /// Canadian or US mutual fund
    MutualFund,
    /// Stock indices
    Index,
    /// Unknown security type
    #[serde(other)]
    Unknown,
}

/// Currency of a listing or balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Canadian dollar
    #[serde(rename = "CAD")]
    Cad,
    /// US dollar
    #[serde(rename = "USD")]
    Usd,
    /// Unknown currency
    #[serde(other)]
    Unknown,
}
