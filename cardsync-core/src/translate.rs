//! Maps provider transactions onto ledger transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerTransaction;
use crate::source::{SourceKind, SourceTransaction};

/// Prefix of every import id this tool generates.
pub const IMPORT_ID_PREFIX: &str = "PROVIDER";

/// How import ids are derived.
///
/// `Timestamped` embeds the run's wall-clock second, so the same source
/// transaction gets a fresh id every run and the ledger never reports a
/// duplicate; only the balance stop rule prevents re-imports.
/// `Stable` uses the transaction's own date and survives reruns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportIdScheme {
    #[default]
    Timestamped,
    Stable,
}

impl std::str::FromStr for ImportIdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamped" => Ok(ImportIdScheme::Timestamped),
            "stable" => Ok(ImportIdScheme::Stable),
            other => Err(format!(
                "unknown import id scheme {other:?} (expected timestamped or stable)"
            )),
        }
    }
}

/// Per-run translation settings.
#[derive(Debug, Clone)]
pub struct Translator {
    pub account_id: String,
    pub category_id: String,
    pub import_ids: ImportIdScheme,
    /// Captured once per run
    pub imported_at: DateTime<Utc>,
}

impl Translator {
    pub fn new(
        account_id: impl Into<String>,
        category_id: impl Into<String>,
        imported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            category_id: category_id.into(),
            import_ids: ImportIdScheme::default(),
            imported_at,
        }
    }

    pub fn with_import_ids(mut self, scheme: ImportIdScheme) -> Self {
        self.import_ids = scheme;
        self
    }

    pub fn translate(&self, txn: &SourceTransaction) -> LedgerTransaction {
        let (amount, category_id, memo) = match &txn.kind {
            SourceKind::Usage {
                entry_location,
                exit_location,
                ..
            } => (
                -txn.amount,
                Some(self.category_id.clone()),
                format!("{entry_location} - {exit_location}"),
            ),
            SourceKind::Reload { reload_location } => {
                (txn.amount, None, format!("Reload: {reload_location}"))
            }
        };

        LedgerTransaction {
            account_id: self.account_id.clone(),
            category_id,
            date: txn.timestamp.date(),
            amount,
            memo,
            cleared: false,
            approved: true,
            import_id: self.import_id(txn),
        }
    }

    pub fn import_id(&self, txn: &SourceTransaction) -> String {
        match self.import_ids {
            ImportIdScheme::Timestamped => format!(
                "{IMPORT_ID_PREFIX}:{}:{}",
                txn.number,
                self.imported_at.timestamp()
            ),
            ImportIdScheme::Stable => format!(
                "{IMPORT_ID_PREFIX}:{}:{}",
                txn.number,
                txn.timestamp.format("%Y%m%d")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Milliunits;
    use chrono::{NaiveDate, TimeZone};

    fn usage(amount: &str) -> SourceTransaction {
        SourceTransaction {
            number: "T1001".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(23, 59, 10)
                .unwrap(),
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            kind: SourceKind::Usage {
                entry_location: "Gate A".to_string(),
                entry_sp: "SP1".to_string(),
                exit_location: "Gate B".to_string(),
                exit_sp: "SP2".to_string(),
            },
            amount: amount.parse().unwrap(),
            balance: "37.50".parse().unwrap(),
            class: "Class 1".to_string(),
            tag_number: "".to_string(),
        }
    }

    fn reload(amount: &str) -> SourceTransaction {
        SourceTransaction {
            kind: SourceKind::Reload {
                reload_location: "Kiosk 3".to_string(),
            },
            ..usage(amount)
        }
    }

    fn translator() -> Translator {
        let at = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        Translator::new("acct-1", "cat-transport", at)
    }

    #[test]
    fn test_usage_is_an_outflow_with_category() {
        let out = translator().translate(&usage("12.50"));
        assert_eq!(out.amount, Milliunits::new(-12_500));
        assert!(!out.amount.is_positive());
        assert_eq!(out.category_id.as_deref(), Some("cat-transport"));
        assert_eq!(out.memo, "Gate A - Gate B");
        assert_eq!(out.account_id, "acct-1");
    }

    #[test]
    fn test_reload_is_an_inflow_without_category() {
        let out = translator().translate(&reload("100.00"));
        assert_eq!(out.amount, Milliunits::new(100_000));
        assert!(!out.amount.is_negative());
        assert_eq!(out.category_id, None);
        assert_eq!(out.memo, "Reload: Kiosk 3");
    }

    #[test]
    fn test_flags_and_date() {
        let out = translator().translate(&usage("1.00"));
        assert!(!out.cleared);
        assert!(out.approved);
        // Calendar date of the timestamp, not the posted date
        assert_eq!(out.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_zero_usage_is_not_positive() {
        let out = translator().translate(&usage("0.00"));
        assert_eq!(out.amount, Milliunits::ZERO);
    }

    #[test]
    fn test_timestamped_import_id() {
        let t = translator();
        let out = t.translate(&usage("1.00"));
        assert_eq!(
            out.import_id,
            format!("PROVIDER:T1001:{}", t.imported_at.timestamp())
        );
        assert_eq!(out.import_id, "PROVIDER:T1001:1704672000");
    }

    #[test]
    fn test_stable_import_id_ignores_run_time() {
        let early = translator().with_import_ids(ImportIdScheme::Stable);
        let mut late = early.clone();
        late.imported_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let txn = usage("1.00");
        assert_eq!(early.import_id(&txn), "PROVIDER:T1001:20240105");
        assert_eq!(early.import_id(&txn), late.import_id(&txn));
    }

    #[test]
    fn test_import_id_scheme_from_str() {
        assert_eq!("Stable".parse::<ImportIdScheme>(), Ok(ImportIdScheme::Stable));
        assert_eq!("timestamped".parse::<ImportIdScheme>(), Ok(ImportIdScheme::Timestamped));
        assert!("hash".parse::<ImportIdScheme>().is_err());
    }
}
