//! Balance-matching sync: decide which provider transactions are new and
//! push them to the ledger.
//!
//! No sync state is persisted. Each run compares the provider's running
//! balance (newest first) with the ledger account balance and treats every
//! transaction before the first match as not yet imported.

use std::error::Error as StdError;

use anyhow::{Context, Result};

use crate::ledger::{LedgerAccount, LedgerTransaction};
use crate::money::Milliunits;
use crate::source::{DateRange, SourceTransaction};
use crate::translate::Translator;

/// Anything that can list card transactions, newest first.
#[allow(async_fn_in_trait)]
pub trait TransactionSource {
    type Error: StdError + Send + Sync + 'static;

    async fn fetch_transactions(
        &self,
        card_serial_number: &str,
        range: DateRange,
    ) -> std::result::Result<Vec<SourceTransaction>, Self::Error>;
}

/// The budget ledger.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    type Error: StdError + Send + Sync + 'static;

    async fn get_account(
        &self,
        budget_id: &str,
        account_id: &str,
    ) -> std::result::Result<LedgerAccount, Self::Error>;

    /// Submits one all-or-nothing batch.
    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: &[LedgerTransaction],
    ) -> std::result::Result<(), Self::Error>;
}

impl<T: TransactionSource> TransactionSource for &T {
    type Error = T::Error;

    async fn fetch_transactions(
        &self,
        card_serial_number: &str,
        range: DateRange,
    ) -> std::result::Result<Vec<SourceTransaction>, Self::Error> {
        (**self).fetch_transactions(card_serial_number, range).await
    }
}

impl<T: Ledger> Ledger for &T {
    type Error = T::Error;

    async fn get_account(
        &self,
        budget_id: &str,
        account_id: &str,
    ) -> std::result::Result<LedgerAccount, Self::Error> {
        (**self).get_account(budget_id, account_id).await
    }

    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: &[LedgerTransaction],
    ) -> std::result::Result<(), Self::Error> {
        (**self).create_transactions(budget_id, transactions).await
    }
}

/// The newest-first prefix of `transactions` that precedes the first entry
/// whose balance equals `ledger_balance`. Without a match, everything is new.
pub fn new_transactions(
    transactions: &[SourceTransaction],
    ledger_balance: Milliunits,
) -> &[SourceTransaction] {
    let end = transactions
        .iter()
        .position(|t| t.balance == ledger_balance)
        .unwrap_or(transactions.len());
    &transactions[..end]
}

/// Translate the new prefix, keeping newest-first order.
pub fn plan(
    transactions: &[SourceTransaction],
    ledger_balance: Milliunits,
    translator: &Translator,
) -> Vec<LedgerTransaction> {
    new_transactions(transactions, ledger_balance)
        .iter()
        .map(|t| translator.translate(t))
        .collect()
}

/// Identifiers for one sync run.
#[derive(Debug, Clone)]
pub struct SyncJob {
    pub budget_id: String,
    pub card_serial_number: String,
    pub range: DateRange,
    pub translator: Translator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub imported: usize,
}

pub struct SyncEngine<S, L> {
    source: S,
    ledger: L,
}

impl<S, L> SyncEngine<S, L>
where
    S: TransactionSource,
    L: Ledger,
{
    pub fn new(source: S, ledger: L) -> Self {
        Self { source, ledger }
    }

    /// Fetch account, fetch transactions, diff, submit. Stops at the first
    /// failing step.
    pub async fn run(&self, job: &SyncJob) -> Result<SyncReport> {
        let account_id = &job.translator.account_id;
        let account = self
            .ledger
            .get_account(&job.budget_id, account_id)
            .await
            .with_context(|| format!("failed to fetch ledger account {account_id}"))?;

        tracing::debug!(
            account = %account.name,
            balance = %account.balance.to_major_string(),
            "fetched ledger account"
        );

        let transactions = self
            .source
            .fetch_transactions(&job.card_serial_number, job.range)
            .await
            .with_context(|| {
                format!(
                    "failed to fetch card transactions for {} ({} to {})",
                    job.card_serial_number, job.range.from, job.range.to
                )
            })?;

        let batch = plan(&transactions, account.balance, &job.translator);
        tracing::info!("found {} new transactions", batch.len());

        if !batch.is_empty() {
            self.ledger
                .create_transactions(&job.budget_id, &batch)
                .await
                .with_context(|| format!("failed to import {} transactions", batch.len()))?;
        }

        Ok(SyncReport {
            fetched: transactions.len(),
            imported: batch.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn txn(number: &str, balance: &str) -> SourceTransaction {
        SourceTransaction {
            number: number.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            kind: SourceKind::Usage {
                entry_location: "A".to_string(),
                entry_sp: String::new(),
                exit_location: "B".to_string(),
                exit_sp: String::new(),
            },
            amount: "1.00".parse().unwrap(),
            balance: balance.parse().unwrap(),
            class: String::new(),
            tag_number: String::new(),
        }
    }

    fn numbers(txns: &[SourceTransaction]) -> Vec<&str> {
        txns.iter().map(|t| t.number.as_str()).collect()
    }

    #[test]
    fn test_stops_at_first_balance_match() {
        let txns = vec![
            txn("4", "500"),
            txn("3", "480"),
            txn("2", "450"),
            txn("1", "400"),
        ];
        let new = new_transactions(&txns, Milliunits::new(450_000));
        assert_eq!(numbers(new), vec!["4", "3"]);
    }

    #[test]
    fn test_no_match_takes_everything() {
        let txns = vec![txn("2", "500"), txn("1", "480")];
        let new = new_transactions(&txns, Milliunits::new(999_000));
        assert_eq!(numbers(new), vec!["2", "1"]);
    }

    #[test]
    fn test_match_on_newest_means_nothing_new() {
        let txns = vec![txn("2", "500"), txn("1", "480")];
        assert!(new_transactions(&txns, Milliunits::new(500_000)).is_empty());
    }

    #[test]
    fn test_repeated_balance_stops_at_first_occurrence() {
        let txns = vec![txn("3", "10"), txn("2", "20"), txn("1", "10")];
        let new = new_transactions(&txns, Milliunits::new(20_000));
        assert_eq!(numbers(new), vec!["3"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(new_transactions(&[], Milliunits::ZERO).is_empty());
    }

    #[test]
    fn test_plan_preserves_newest_first_order() {
        let txns = vec![txn("3", "500"), txn("2", "480"), txn("1", "450")];
        let at = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let translator = Translator::new("acct", "cat", at);

        let batch = plan(&txns, Milliunits::new(450_000), &translator);
        let ids: Vec<_> = batch.iter().map(|t| t.import_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["PROVIDER:3:1704672000", "PROVIDER:2:1704672000"]
        );
    }
}
