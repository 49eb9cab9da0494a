//! Ledger JSON format.

use cardsync_core::{LedgerAccount, LedgerTransaction, Milliunits};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One transaction in a bulk-create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPayload {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub memo: String,
    pub cleared: &'static str,
    pub approved: bool,
    pub import_id: String,
}

impl From<&LedgerTransaction> for TransactionPayload {
    fn from(t: &LedgerTransaction) -> Self {
        Self {
            account_id: t.account_id.clone(),
            date: t.date.format(DATE_FORMAT).to_string(),
            amount: t.amount.value(),
            category_id: t.category_id.clone(),
            memo: t.memo.clone(),
            cleared: if t.cleared { "cleared" } else { "uncleared" },
            approved: t.approved,
            import_id: t.import_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveTransactions {
    pub transactions: Vec<TransactionPayload>,
}

impl SaveTransactions {
    pub fn new(transactions: &[LedgerTransaction]) -> Self {
        Self {
            transactions: transactions.iter().map(TransactionPayload::from).collect(),
        }
    }
}

/// `GET /budgets/{budget}/accounts/{account}` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountEnvelope {
    pub data: AccountData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub account: AccountBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountBody {
    pub id: String,
    pub name: String,
    /// Milliunits
    pub balance: i64,
}

impl From<AccountEnvelope> for LedgerAccount {
    fn from(envelope: AccountEnvelope) -> Self {
        let account = envelope.data.account;
        LedgerAccount {
            id: account.id,
            name: account.name,
            balance: Milliunits::new(account.balance),
        }
    }
}
