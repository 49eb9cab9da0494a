//! cardsync-ledger: budget ledger connector (account lookup and batch import)

pub mod client;
pub mod error;
pub mod wire;

pub use client::{DEFAULT_BASE_URL, LedgerClient};
pub use error::{LedgerError, classify_submission};
pub use wire::{AccountEnvelope, SaveTransactions, TransactionPayload};
