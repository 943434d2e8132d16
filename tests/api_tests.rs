//! Integration tests for the typed account and market data services.
//!
//! Payloads mirror what the Questrade API returns; requests are served by a
//! local mock server that also plays the token endpoint.
//!
//! Run with: cargo test --test api_tests

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use mockito::{Matcher, Mock, Server, ServerGuard};
use rust_decimal_macros::dec;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use questrade_rs::prelude::*;

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

const TOKEN_PATH: &str = "/oauth2/token";

fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig::default().with_auth_url(format!("{}{}", server.url(), TOKEN_PATH))
}

/// Store holding a credential whose API server is the mock server.
fn store_for(server: &ServerGuard) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_yaml(format!(
        "access_token: hunter2\napi_server: {}/\nexpires_in: 1234\nrefresh_token: hunter3\ntoken_type: Bearer\n",
        server.url()
    )))
}

fn client_for(server: &ServerGuard, config: ClientConfig) -> QuestradeClient {
    QuestradeClient::from_store(store_for(server), config).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn ticker_info() -> serde_json::Value {
    json!({
        "averageVol20Days": 2,
        "averageVol3Months": 4,
        "currency": "CAD",
        "description": "XYZ Company Inc.",
        "dividend": 0,
        "dividendDate": null,
        "eps": 2,
        "exDate": null,
        "hasOptions": true,
        "highPrice52": 25.00,
        "industryGroup": "XYZ Industry",
        "industrySector": "XYZ",
        "industrySubgroup": "XYZ Special",
        "isQuotable": true,
        "isTradable": true,
        "listingExchange": "TSX",
        "lowPrice52": 9.83,
        "marketCap": 275784564,
        "minTicks": [{"minTick": 0.005, "pivot": 0}, {"minTick": 0.01, "pivot": 0.5}],
        "optionContractDeliverables": {"cashInLieu": 0, "underlyings": []},
        "optionDurationType": null,
        "optionExerciseType": null,
        "optionExpiryDate": null,
        "optionRoot": "",
        "optionStrikePrice": null,
        "optionType": null,
        "outstandingShares": 1234664,
        "pe": null,
        "prevDayClosePrice": 20.01,
        "securityType": "Stock",
        "symbol": "XYZ",
        "symbolId": 1234567,
        "tradeUnit": 1,
        "yield": 0
    })
}

fn quote() -> serde_json::Value {
    json!({
        "VWAP": 0,
        "askPrice": null,
        "askSize": 0,
        "bidPrice": null,
        "bidSize": 0,
        "delay": 0,
        "high52w": 25.00,
        "highPrice": 0,
        "isHalted": false,
        "lastTradePrice": 20.01,
        "lastTradePriceTrHrs": null,
        "lastTradeSize": 0,
        "lastTradeTick": "Equal",
        "lastTradeTime": "2018-09-14T00:00:00.000000-04:00",
        "low52w": 9.83,
        "lowPrice": 0,
        "openPrice": 0,
        "symbol": "XYZ",
        "symbolId": 1234567,
        "tier": "",
        "volume": 0
    })
}

async fn mock_symbols(
    server: &mut ServerGuard,
    names: &str,
    infos: Vec<serde_json::Value>,
) -> Mock {
    server
        .mock("GET", "/v1/symbols")
        .match_query(Matcher::UrlEncoded("names".into(), names.into()))
        .match_header("authorization", "Bearer hunter2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "symbols": infos }).to_string())
        .create_async()
        .await
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_list_accounts() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/accounts")
        .match_header("authorization", "Bearer hunter2")
        .with_status(200)
        .with_body(
            json!({
                "accounts": [
                    {
                        "type": "Margin",
                        "number": "26598145",
                        "status": "Active",
                        "isPrimary": true,
                        "isBilling": true,
                        "clientAccountType": "Individual"
                    },
                    { "type": "TFSA", "number": "26598146", "status": "Active" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let accounts = client.accounts().list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].number.as_str(), "26598145");
    assert_eq!(accounts[0].account_type.as_deref(), Some("Margin"));
    assert!(accounts[0].is_primary);
    assert_eq!(accounts[0].client_account_type.as_deref(), Some("Individual"));
    assert!(!accounts[1].is_primary);
}

#[tokio::test]
async fn test_account_numbers() {
    init_logging();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/accounts")
        .with_status(200)
        .with_body(r#"{"accounts": [{"number": 123}, {"number": 456}]}"#)
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let numbers = client.accounts().numbers().await.unwrap();

    assert_eq!(numbers, vec![AccountNumber::new("123"), AccountNumber::new("456")]);
}

#[tokio::test]
async fn test_positions() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/accounts/123/positions")
        .with_status(200)
        .with_body(
            json!({
                "positions": [
                    {
                        "averageEntryPrice": 1000,
                        "closedPnl": 0,
                        "closedQuantity": 0,
                        "currentMarketValue": 3120,
                        "currentPrice": 1040,
                        "isRealTime": false,
                        "isUnderReorg": false,
                        "openPnl": 120,
                        "openQuantity": 3,
                        "symbol": "XYZ",
                        "symbolId": 1234567,
                        "totalCost": 3000
                    },
                    {
                        "averageEntryPrice": 500,
                        "closedPnl": 0,
                        "closedQuantity": 0,
                        "currentMarketValue": 4000,
                        "currentPrice": 1000,
                        "isRealTime": false,
                        "isUnderReorg": false,
                        "openPnl": 2000,
                        "openQuantity": 4,
                        "symbol": "ABC",
                        "symbolId": 7654321,
                        "totalCost": 2000
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let positions = client
        .accounts()
        .positions(&AccountNumber::new("123"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].symbol, "XYZ");
    assert_eq!(positions[0].symbol_id, SymbolId::new(1234567));
    assert_eq!(positions[0].open_quantity, dec!(3));
    assert_eq!(positions[0].current_market_value, Some(dec!(3120)));
    assert_eq!(positions[1].open_pnl, Some(dec!(2000)));
    assert!(!positions[1].is_short());
}

#[tokio::test]
async fn test_activities() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/accounts/123/activities")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startTime".into(), "2018-08-07T00:00:00-05:00".into()),
            Matcher::UrlEncoded("endTime".into(), "2018-08-10T00:00:00-05:00".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "activities": [
                    {
                        "action": "Buy",
                        "commission": -5.01,
                        "currency": "CAD",
                        "description": "description text",
                        "grossAmount": -1000,
                        "netAmount": -1005.01,
                        "price": 10,
                        "quantity": 100,
                        "settlementDate": "2018-08-09T00:00:00.000000-04:00",
                        "symbol": "XYZ.TO",
                        "symbolId": 1234567,
                        "tradeDate": "2018-08-07T00:00:00.000000-04:00",
                        "transactionDate": "2018-08-09T00:00:00.000000-04:00",
                        "type": "Trades"
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let activities = client
        .accounts()
        .activities(&AccountNumber::new("123"), date(2018, 8, 7), date(2018, 8, 10))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(activities.len(), 1);
    let activity = &activities[0];
    assert_eq!(activity.action, "Buy");
    assert_eq!(activity.symbol, "XYZ.TO");
    assert_eq!(activity.currency, Some(Currency::Cad));
    assert_eq!(activity.commission, dec!(-5.01));
    assert_eq!(activity.net_amount, dec!(-1005.01));
    assert_eq!(activity.trade_date.day(), 7);
}

#[tokio::test]
async fn test_activities_rejects_inverted_window() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let result = client
        .accounts()
        .activities(&AccountNumber::new("123"), date(2018, 8, 10), date(2018, 8, 7))
        .await;

    mock.assert_async().await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn test_symbol_lookup() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = mock_symbols(&mut server, "XYZ", vec![ticker_info()]).await;

    let client = client_for(&server, config_for(&server));
    let info = client.market_data().symbol("XYZ").await.unwrap();

    mock.assert_async().await;
    assert_eq!(info.symbol, "XYZ");
    assert_eq!(info.symbol_id, SymbolId::new(1234567));
    assert_eq!(info.security_type, SecurityType::Stock);
    assert_eq!(info.currency, Some(Currency::Cad));
    assert_eq!(info.prev_day_close_price, Some(dec!(20.01)));
    assert_eq!(info.dividend_yield, Some(dec!(0)));
    assert!(info.pe.is_none());
    assert!(info.has_options);
}

#[tokio::test]
async fn test_symbols_multiple() {
    init_logging();
    let mut server = Server::new_async().await;
    let mock = mock_symbols(&mut server, "XYZ,ABC", vec![ticker_info(), ticker_info()]).await;

    let client = client_for(&server, config_for(&server));
    let infos = client.market_data().symbols(&["XYZ", "ABC"]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(infos.len(), 2);
}

#[tokio::test]
async fn test_symbol_not_found() {
    init_logging();
    let mut server = Server::new_async().await;
    let _mock = mock_symbols(&mut server, "NOPE", vec![]).await;

    let client = client_for(&server, config_for(&server));
    let result = client.market_data().symbol("NOPE").await;

    assert!(matches!(result, Err(Error::InvalidSymbol(ref s)) if s == "NOPE"));
}

#[tokio::test]
async fn test_quote_unknown_ticker() {
    init_logging();
    let mut server = Server::new_async().await;
    let _symbols = mock_symbols(&mut server, "BOGUS", vec![]).await;
    let quotes = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let result = client.market_data().quote("BOGUS").await;

    quotes.assert_async().await;
    assert!(matches!(result, Err(Error::InvalidSymbol(ref s)) if s == "BOGUS"));
}

#[tokio::test]
async fn test_symbols_requires_tickers() {
    init_logging();
    let server = Server::new_async().await;
    let client = client_for(&server, config_for(&server));

    let result = client.market_data().symbols(&[]).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_quote() {
    init_logging();
    let mut server = Server::new_async().await;
    let _symbols = mock_symbols(&mut server, "XYZ", vec![ticker_info()]).await;
    let quotes = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::UrlEncoded("ids".into(), "1234567".into()))
        .with_status(200)
        .with_body(json!({ "quotes": [quote()] }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let quote = client.market_data().quote("XYZ").await.unwrap();

    quotes.assert_async().await;
    assert_eq!(quote.symbol, "XYZ");
    assert_eq!(quote.last_trade_price, Some(dec!(20.01)));
    assert_eq!(quote.last_trade_tick, Some(TickType::Equal));
    assert_eq!(quote.high52w, Some(dec!(25.00)));
    assert!(quote.bid_price.is_none());
    assert!(quote.mid_price().is_none());
}

#[tokio::test]
async fn test_quotes_multiple() {
    init_logging();
    let mut server = Server::new_async().await;
    let _symbols = mock_symbols(&mut server, "XYZ,ABC", vec![ticker_info(), ticker_info()]).await;
    let quotes = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::UrlEncoded("ids".into(), "1234567,1234567".into()))
        .with_status(200)
        .with_body(json!({ "quotes": [quote(), quote()] }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let result = client.market_data().quotes(&["XYZ", "ABC"]).await.unwrap();

    quotes.assert_async().await;
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_candles() {
    init_logging();
    let mut server = Server::new_async().await;
    let _symbols = mock_symbols(&mut server, "XYZ", vec![ticker_info()]).await;
    let candles = server
        .mock("GET", "/v1/markets/candles/1234567")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startTime".into(), "2018-08-01T00:00:00-05:00".into()),
            Matcher::UrlEncoded("endTime".into(), "2018-08-02T00:00:00-05:00".into()),
            Matcher::UrlEncoded("interval".into(), "OneDay".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "candles": [
                    {
                        "VWAP": 34.246962,
                        "close": 33.56,
                        "end": "2018-08-02T00:00:00.000000-04:00",
                        "high": 34.97,
                        "low": 33.51,
                        "open": 34.7,
                        "start": "2018-08-01T01:00:00.000000-04:00",
                        "volume": 3251329
                    },
                    {
                        "VWAP": 33.724063,
                        "close": 34.4,
                        "end": "2018-08-03T00:00:00.000000-04:00",
                        "high": 34.57,
                        "low": 32.85,
                        "open": 33.59,
                        "start": "2018-08-02T00:00:00.000000-04:00",
                        "volume": 3642444
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let result = client
        .market_data()
        .candles("XYZ", date(2018, 8, 1), date(2018, 8, 2), CandleInterval::OneDay)
        .await
        .unwrap();

    candles.assert_async().await;
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].close, dec!(33.56));
    assert_eq!(result[0].volume, 3251329);
    assert_eq!(result[1].vwap, Some(dec!(33.724063)));
    assert!(result[0].start < result[1].start);
}

// =============================================================================
// Client behavior
// =============================================================================

#[tokio::test]
async fn test_service_error_status() {
    init_logging();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/accounts")
        .with_status(401)
        .with_body(r#"{"code": 1017, "message": "Access token is invalid"}"#)
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let err = client.accounts().list().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_auto_refresh_before_request() {
    init_logging();
    let mut server = Server::new_async().await;
    let token = server
        .mock("GET", TOKEN_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "hunter3".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "access_token": "hunter4",
                "api_server": format!("{}/", server.url()),
                "expires_in": 1800,
                "refresh_token": "hunter5",
                "token_type": "Bearer"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let accounts = server
        .mock("GET", "/v1/accounts")
        .match_header("authorization", "Bearer hunter4")
        .with_status(200)
        .with_body(r#"{"accounts": [{"number": 123}]}"#)
        .create_async()
        .await;

    // Stored token lives 1234s; a 1500s buffer forces one refresh, after
    // which the 1800s token is comfortably valid.
    let config = config_for(&server)
        .with_auto_refresh(true)
        .with_refresh_buffer(Duration::from_secs(1500));
    let client = client_for(&server, config);
    let numbers = client.accounts().numbers().await.unwrap();

    token.assert_async().await;
    accounts.assert_async().await;
    assert_eq!(numbers, vec![AccountNumber::new("123")]);
    assert_eq!(
        client.session().credential().await.unwrap().refresh_token(),
        "hunter5"
    );
}

#[tokio::test]
async fn test_auto_refresh_saves_to_store() {
    init_logging();
    let mut server = Server::new_async().await;
    let _token = server
        .mock("GET", TOKEN_PATH)
        .match_query(Matcher::UrlEncoded("refresh_token".into(), "hunter3".into()))
        .with_status(200)
        .with_body(
            json!({
                "access_token": "hunter4",
                "api_server": format!("{}/", server.url()),
                "expires_in": 1800,
                "refresh_token": "hunter5",
                "token_type": "Bearer"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _accounts = server
        .mock("GET", "/v1/accounts")
        .with_status(200)
        .with_body(r#"{"accounts": []}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    let config = config_for(&server)
        .with_auto_refresh(true)
        .with_refresh_buffer(Duration::from_secs(1500));
    let client = QuestradeClient::from_store(store.clone(), config).unwrap();
    client.accounts().list().await.unwrap();

    // The next process start must find the token the server just issued
    let saved = store.load().unwrap();
    assert_eq!(saved.access_token(), "hunter4");
    assert_eq!(saved.refresh_token(), "hunter5");
}

#[tokio::test]
async fn test_auto_refresh_with_unbounded_buffer() {
    init_logging();
    let mut server = Server::new_async().await;
    let token = server
        .mock("GET", TOKEN_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "access_token": "hunter4",
                "api_server": format!("{}/", server.url()),
                "expires_in": 1800,
                "refresh_token": "hunter5",
                "token_type": "Bearer"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let _accounts = server
        .mock("GET", "/v1/accounts")
        .match_header("authorization", "Bearer hunter4")
        .with_status(200)
        .with_body(r#"{"accounts": []}"#)
        .create_async()
        .await;

    let config = config_for(&server)
        .with_auto_refresh(true)
        .with_refresh_buffer(Duration::from_secs(u64::MAX));
    let client = client_for(&server, config);
    let accounts = client.accounts().list().await.unwrap();

    token.assert_async().await;
    assert!(accounts.is_empty());
}

#[tokio::test]
async fn test_manual_refresh_through_client() {
    init_logging();
    let mut server = Server::new_async().await;
    let _token = server
        .mock("GET", TOKEN_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "access_token": "hunter4",
                "api_server": format!("{}/", server.url()),
                "expires_in": 1800,
                "refresh_token": "hunter5",
                "token_type": "Bearer"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, config_for(&server));
    let credential = client.refresh_session(RefreshSource::Current).await.unwrap();

    assert_eq!(credential.access_token(), "hunter4");
    assert_eq!(client.session().status().await, SessionStatus::Active);
}
