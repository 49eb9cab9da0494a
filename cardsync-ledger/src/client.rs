use cardsync_core::{Ledger, LedgerAccount, LedgerTransaction};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{LedgerError, classify_submission};
use crate::wire::{AccountEnvelope, SaveTransactions};

pub const DEFAULT_BASE_URL: &str = "https://api.youneedabudget.com/v1";

/// Bearer-token client for the budget ledger API.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    base_url: String,
    access_token: String,
    http: reqwest::Client,
}

impl LedgerClient {
    /// `insecure` disables TLS certificate verification.
    pub fn new(access_token: impl Into<String>, insecure: bool) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn account_url(&self, budget_id: &str, account_id: &str) -> String {
        format!("{}/budgets/{budget_id}/accounts/{account_id}", self.base_url)
    }

    pub fn transactions_url(&self, budget_id: &str) -> String {
        format!("{}/budgets/{budget_id}/transactions", self.base_url)
    }

    fn headers(&self) -> Result<HeaderMap, LedgerError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|_| LedgerError::InvalidToken)?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    pub async fn get_account(
        &self,
        budget_id: &str,
        account_id: &str,
    ) -> Result<LedgerAccount, LedgerError> {
        let resp = self
            .http
            .get(self.account_url(budget_id, account_id))
            .headers(self.headers()?)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LedgerError::Status { status, body });
        }

        let envelope: AccountEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.into())
    }

    /// Bulk-create `transactions` in one request.
    pub async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: &[LedgerTransaction],
    ) -> Result<(), LedgerError> {
        tracing::debug!("submitting {} transactions", transactions.len());

        let resp = self
            .http
            .post(self.transactions_url(budget_id))
            .headers(self.headers()?)
            .json(&SaveTransactions::new(transactions))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        classify_submission(status, body)
    }
}

impl Ledger for LedgerClient {
    type Error = LedgerError;

    async fn get_account(
        &self,
        budget_id: &str,
        account_id: &str,
    ) -> Result<LedgerAccount, LedgerError> {
        LedgerClient::get_account(self, budget_id, account_id).await
    }

    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: &[LedgerTransaction],
    ) -> Result<(), LedgerError> {
        LedgerClient::create_transactions(self, budget_id, transactions).await
    }
}
