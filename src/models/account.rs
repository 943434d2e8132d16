//! Account, position and activity models.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::Currency;
use super::primitives::{AccountNumber, SymbolId};

/// A brokerage account accessible with the current credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account number
    pub number: AccountNumber,
    /// Account type (e.g., "Margin", "TFSA", "RRSP")
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    /// Account status (e.g., "Active")
    #[serde(default)]
    pub status: Option<String>,
    /// Whether this is the primary account of the holder
    #[serde(default)]
    pub is_primary: bool,
    /// Whether this account is billed for data packages
    #[serde(default)]
    pub is_billing: bool,
    /// Type of client holding the account (e.g., "Individual")
    #[serde(default)]
    pub client_account_type: Option<String>,
}

/// An open or recently closed position in an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Ticker symbol
    pub symbol: String,
    /// Internal symbol ID
    pub symbol_id: SymbolId,
    /// Quantity currently held
    pub open_quantity: Decimal,
    /// Quantity closed today
    #[serde(default)]
    pub closed_quantity: Decimal,
    /// Market value of the open quantity
    #[serde(default)]
    pub current_market_value: Option<Decimal>,
    /// Current price of the security
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Average price paid for the open quantity
    #[serde(default)]
    pub average_entry_price: Option<Decimal>,
    /// Realized profit or loss on the closed quantity
    #[serde(default)]
    pub closed_pnl: Option<Decimal>,
    /// Unrealized profit or loss on the open quantity
    #[serde(default)]
    pub open_pnl: Option<Decimal>,
    /// Total cost of the open quantity
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    /// Whether prices are real-time rather than delayed
    #[serde(default)]
    pub is_real_time: bool,
    /// Whether the security is undergoing a reorganization
    #[serde(default)]
    pub is_under_reorg: bool,
}

impl Position {
    /// Returns `true` if the position is short.
    pub fn is_short(&self) -> bool {
        self.open_quantity.is_sign_negative()
    }
}

/// A trade, dividend, deposit or other account activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Trade date
    pub trade_date: DateTime<FixedOffset>,
    /// Transaction date
    pub transaction_date: DateTime<FixedOffset>,
    /// Settlement date
    pub settlement_date: DateTime<FixedOffset>,
    /// Activity action (e.g., "Buy", "Sell")
    #[serde(default)]
    pub action: String,
    /// Ticker symbol, empty for non-security activities
    #[serde(default)]
    pub symbol: String,
    /// Internal symbol ID, zero for non-security activities
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Currency of the amounts
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Quantity traded
    #[serde(default)]
    pub quantity: Decimal,
    /// Price per unit
    #[serde(default)]
    pub price: Decimal,
    /// Gross amount before commission
    #[serde(default)]
    pub gross_amount: Decimal,
    /// Commission charged
    #[serde(default)]
    pub commission: Decimal,
    /// Net amount after commission
    #[serde(default)]
    pub net_amount: Decimal,
    /// Activity category (e.g., "Trades", "Dividends", "Deposits")
    #[serde(rename = "type")]
    pub activity_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_position() {
        let json = serde_json::json!({
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
        });

        let position: Position = serde_json::from_value(json).unwrap();
        assert_eq!(position.symbol, "XYZ");
        assert_eq!(position.symbol_id, SymbolId::new(1234567));
        assert_eq!(position.current_market_value, Some(dec!(3120)));
        assert_eq!(position.open_quantity, dec!(3));
        assert!(!position.is_short());
    }

    #[test]
    fn test_deserialize_activity() {
        let json = serde_json::json!({
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
        });

        let activity: Activity = serde_json::from_value(json).unwrap();
        assert_eq!(activity.action, "Buy");
        assert_eq!(activity.activity_type, "Trades");
        assert_eq!(activity.currency, Some(Currency::Cad));
        assert_eq!(activity.commission, dec!(-5.01));
        assert_eq!(activity.net_amount, dec!(-1005.01));
        assert_eq!(
            activity.trade_date.to_rfc3339(),
            "2018-08-07T00:00:00-04:00"
        );
    }

    #[test]
    fn test_deserialize_account_with_integer_number() {
        let account: Account =
            serde_json::from_value(serde_json::json!({ "number": 123 })).unwrap();
        assert_eq!(account.number.as_str(), "123");
        assert!(account.account_type.is_none());
    }
}
