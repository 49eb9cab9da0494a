use cardsync_core::{AmountError, Milliunits};
use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the card provider or reading what it sent back.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("card provider request failed")]
    Transport(#[from] reqwest::Error),
    #[error("card provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed transaction list")]
    Json(#[from] serde_json::Error),
    #[error("transaction {number}: invalid timestamp {value:?}")]
    InvalidTimestamp {
        number: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("transaction {number}: invalid posted date {value:?}")]
    InvalidDate {
        number: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("transaction {number}: unknown type {value:?}")]
    UnknownType { number: String, value: String },
    #[error("transaction {number}: reload without a reload location")]
    MissingReloadLocation { number: String },
    #[error("transaction {number}: negative amount {amount}")]
    NegativeAmount { number: String, amount: Milliunits },
    #[error("transaction {number}: invalid {field}")]
    InvalidAmount {
        number: String,
        field: &'static str,
        #[source]
        source: AmountError,
    },
}
