//! Accounts service for account, position and activity queries.

use chrono::NaiveDate;
use std::sync::Arc;

use super::market_day_start;
use crate::client::ClientInner;
use crate::models::{Account, AccountNumber, Activity, Position};
use crate::{Error, Result};

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: questrade_rs::QuestradeClient) -> questrade_rs::Result<()> {
/// let accounts = client.accounts().list().await?;
/// for account in &accounts {
///     println!("Account: {} ({:?})", account.number, account.account_type);
/// }
///
/// if let Some(account) = accounts.first() {
///     let positions = client.accounts().positions(&account.number).await?;
///     println!("{} open positions", positions.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all accounts the current credential can access.
    pub async fn list(&self) -> Result<Vec<Account>> {
        #[derive(serde::Deserialize)]
        struct Response {
            accounts: Vec<Account>,
        }
        let response: Response = self.inner.get("accounts").await?;
        Ok(response.accounts)
    }

    /// List just the account numbers.
    pub async fn numbers(&self) -> Result<Vec<AccountNumber>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|account| account.number)
            .collect())
    }

    /// Get the positions held in an account.
    pub async fn positions(&self, account_number: &AccountNumber) -> Result<Vec<Position>> {
        #[derive(serde::Deserialize)]
        struct Response {
            positions: Vec<Position>,
        }
        let response: Response = self
            .inner
            .get(&format!("accounts/{}/positions", account_number))
            .await?;
        Ok(response.positions)
    }

    /// Get account activities between two dates.
    ///
    /// # Arguments
    ///
    /// * `account_number` - The account to query
    /// * `start` - First day of the window
    /// * `end` - Day the window ends on (at its start)
    pub async fn activities(
        &self,
        account_number: &AccountNumber,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Activity>> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "Activity window ends ({}) before it starts ({})",
                end, start
            )));
        }

        #[derive(serde::Deserialize)]
        struct Response {
            activities: Vec<Activity>,
        }

        let start_time = market_day_start(start);
        let end_time = market_day_start(end);
        let response: Response = self
            .inner
            .get_with_query(
                &format!("accounts/{}/activities", account_number),
                &[("startTime", start_time.as_str()), ("endTime", end_time.as_str())],
            )
            .await?;
        Ok(response.activities)
    }
}
