//! Budget-ledger types ready for submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Milliunits;

/// A ledger transaction built from one source transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub account_id: String,
    /// Only set for card usage
    pub category_id: Option<String>,
    pub date: NaiveDate,
    /// Signed: negative leaves the account, positive enters it
    pub amount: Milliunits,
    pub memo: String,
    pub cleared: bool,
    pub approved: bool,
    /// Dedup key the ledger checks against earlier imports
    pub import_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub id: String,
    pub name: String,
    pub balance: Milliunits,
}
