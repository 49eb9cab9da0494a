use cardsync_core::{DateRange, SourceTransaction, TransactionSource};

use crate::error::SourceError;
use crate::wire::{decode_body, query_params};

/// HTTP client for the card provider's transaction history.
#[derive(Debug, Clone)]
pub struct SourceClient {
    base_url: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl SourceClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base_url.trim_end_matches('/'))
    }

    /// Transactions in `range`, newest first.
    pub async fn get_transactions(
        &self,
        card_serial_number: &str,
        range: DateRange,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let url = self.transactions_url();
        tracing::debug!(%url, from = %range.from, to = %range.to, "fetching card transactions");

        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(&query_params(card_serial_number, range))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status { status, body });
        }

        let txns = decode_body(&body)?;
        tracing::debug!("card provider returned {} transactions", txns.len());
        Ok(txns)
    }
}

impl TransactionSource for SourceClient {
    type Error = SourceError;

    async fn fetch_transactions(
        &self,
        card_serial_number: &str,
        range: DateRange,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        self.get_transactions(card_serial_number, range).await
    }
}
