//! Market data service for symbol lookups, quotes and candles.

use chrono::NaiveDate;
use std::sync::Arc;

use super::market_day_start;
use crate::client::ClientInner;
use crate::models::{Candle, CandleInterval, Quote, SymbolId, SymbolInfo};
use crate::{Error, Result};

/// Service for market data operations.
///
/// Quote and candle endpoints are keyed by [`SymbolId`]; the ticker-based
/// methods resolve IDs through a symbol lookup first.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use questrade_rs::models::CandleInterval;
///
/// # async fn example(client: questrade_rs::QuestradeClient) -> questrade_rs::Result<()> {
/// // Get quotes for several tickers
/// let quotes = client.market_data().quotes(&["XYZ", "ABC"]).await?;
///
/// // Daily candles for one ticker
/// let candles = client.market_data().candles(
///     "XYZ",
///     NaiveDate::from_ymd_opt(2018, 8, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2018, 8, 2).unwrap(),
///     CandleInterval::OneDay,
/// ).await?;
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Look up reference data for one or more tickers.
    ///
    /// Results come back in the order the server returns them.
    pub async fn symbols(&self, tickers: &[&str]) -> Result<Vec<SymbolInfo>> {
        if tickers.is_empty() {
            return Err(Error::InvalidInput(
                "At least one ticker is required".to_string(),
            ));
        }

        #[derive(serde::Deserialize)]
        struct Response {
            symbols: Vec<SymbolInfo>,
        }

        let names = tickers.join(",");
        let response: Response = self
            .inner
            .get_with_query("symbols", &[("names", names.as_str())])
            .await?;
        Ok(response.symbols)
    }

    /// Look up reference data for a single ticker.
    pub async fn symbol(&self, ticker: &str) -> Result<SymbolInfo> {
        self.symbols(&[ticker])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidSymbol(ticker.to_string()))
    }

    /// Get quotes for symbols by ID.
    pub async fn quotes_by_id(&self, ids: &[SymbolId]) -> Result<Vec<Quote>> {
        if ids.is_empty() {
            return Err(Error::InvalidInput(
                "At least one symbol ID is required".to_string(),
            ));
        }

        #[derive(serde::Deserialize)]
        struct Response {
            quotes: Vec<Quote>,
        }

        let ids = ids
            .iter()
            .map(SymbolId::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let response: Response = self
            .inner
            .get_with_query("markets/quotes", &[("ids", ids.as_str())])
            .await?;
        Ok(response.quotes)
    }

    /// Get quotes for one or more tickers.
    ///
    /// Fails with [`Error::InvalidSymbol`] when none of the tickers resolve.
    pub async fn quotes(&self, tickers: &[&str]) -> Result<Vec<Quote>> {
        let ids: Vec<SymbolId> = self
            .symbols(tickers)
            .await?
            .iter()
            .map(|info| info.symbol_id)
            .collect();
        if ids.is_empty() {
            return Err(Error::InvalidSymbol(tickers.join(",")));
        }
        self.quotes_by_id(&ids).await
    }

    /// Get the quote for a single ticker.
    pub async fn quote(&self, ticker: &str) -> Result<Quote> {
        self.quotes(&[ticker])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidSymbol(ticker.to_string()))
    }

    /// Get historical candles for a ticker, ordered by time.
    pub async fn candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: CandleInterval,
    ) -> Result<Vec<Candle>> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "Candle window ends ({}) before it starts ({})",
                end, start
            )));
        }

        #[derive(serde::Deserialize)]
        struct Response {
            candles: Vec<Candle>,
        }

        let info = self.symbol(ticker).await?;
        let start_time = market_day_start(start);
        let end_time = market_day_start(end);
        let response: Response = self
            .inner
            .get_with_query(
                &format!("markets/candles/{}", info.symbol_id),
                &[
                    ("startTime", start_time.as_str()),
                    ("endTime", end_time.as_str()),
                    ("interval", interval.as_str()),
                ],
            )
            .await?;
        Ok(response.candles)
    }
}
