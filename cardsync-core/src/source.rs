//! Card-provider transaction types, decoupled from the provider's wire format.

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::money::Milliunits;

/// One card transaction as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTransaction {
    /// Provider-assigned unique transaction number
    pub number: String,
    /// When the transaction happened, in the provider's local time
    pub timestamp: NaiveDateTime,
    pub posted_date: NaiveDate,
    pub kind: SourceKind,
    /// Always a non-negative magnitude; direction comes from `kind`
    pub amount: Milliunits,
    /// Card balance right after this transaction
    pub balance: Milliunits,
    pub class: String,
    pub tag_number: String,
}

/// What happened on the card. Location fields only exist on the variant
/// they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceKind {
    Usage {
        entry_location: String,
        entry_sp: String,
        exit_location: String,
        exit_sp: String,
    },
    Reload {
        reload_location: String,
    },
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Usage { .. } => "Usage",
            SourceKind::Reload { .. } => "Reload",
        }
    }
}

/// Half-open date window `[from, to)` for provider queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub const DEFAULT_DAYS: u64 = 30;

    /// The 30 days ending at the start of `today`.
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self::ending_at(today, Self::DEFAULT_DAYS)
    }

    pub fn ending_at(to: NaiveDate, days: u64) -> Self {
        let from = to.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { from, to }
    }
}
