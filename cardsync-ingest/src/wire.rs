//! Provider JSON format.
//!
//! A transaction list looks like:
//!
//! ```text
//! [{"number": "000123", "timestamp": "05/01/2024 08:15:00", "posted_date": "06/01/2024",
//!   "type": "Usage", "entry_location": "Gate A", "entry_sp": "...", "exit_location": "Gate B",
//!   "exit_sp": "...", "reload_location": null, "amount": "2.10", "balance": "47.90",
//!   "class": "...", "tag_number": "..."}]
//! ```
//!
//! Query dates go out as `05-Jan-2024`.

use cardsync_core::{DateRange, Milliunits, SourceKind, SourceTransaction};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const QUERY_DATE_FORMAT: &str = "%d-%b-%Y";

const TYPE_USAGE: &str = "Usage";
const TYPE_RELOAD: &str = "Reload";

/// One transaction exactly as the provider sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub number: String,
    pub timestamp: String,
    pub posted_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub entry_location: String,
    #[serde(default)]
    pub entry_sp: String,
    #[serde(default)]
    pub exit_location: String,
    #[serde(default)]
    pub exit_sp: String,
    #[serde(default)]
    pub reload_location: Option<String>,
    pub amount: String,
    pub balance: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub tag_number: String,
}

/// Query string pairs for a transaction listing.
pub fn query_params(card_serial_number: &str, range: DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("card_serial_number", card_serial_number.to_string()),
        ("from", range.from.format(QUERY_DATE_FORMAT).to_string()),
        ("to", range.to.format(QUERY_DATE_FORMAT).to_string()),
    ]
}

/// Decode a full response body, keeping the provider's newest-first order.
pub fn decode_body(body: &str) -> Result<Vec<SourceTransaction>, SourceError> {
    let raw: Vec<RawTransaction> = serde_json::from_str(body)?;
    raw.into_iter().map(decode).collect()
}

pub fn decode(raw: RawTransaction) -> Result<SourceTransaction, SourceError> {
    let timestamp = NaiveDateTime::parse_from_str(raw.timestamp.trim(), TIMESTAMP_FORMAT)
        .map_err(|source| SourceError::InvalidTimestamp {
            number: raw.number.clone(),
            value: raw.timestamp.clone(),
            source,
        })?;

    let posted_date = NaiveDate::parse_from_str(raw.posted_date.trim(), DATE_FORMAT).map_err(
        |source| SourceError::InvalidDate {
            number: raw.number.clone(),
            value: raw.posted_date.clone(),
            source,
        },
    )?;

    let amount = parse_amount(&raw.number, "amount", &raw.amount)?;
    if amount.is_negative() {
        return Err(SourceError::NegativeAmount {
            number: raw.number,
            amount,
        });
    }
    let balance = parse_amount(&raw.number, "balance", &raw.balance)?;

    let kind = match raw.kind.as_str() {
        TYPE_USAGE => SourceKind::Usage {
            entry_location: raw.entry_location,
            entry_sp: raw.entry_sp,
            exit_location: raw.exit_location,
            exit_sp: raw.exit_sp,
        },
        TYPE_RELOAD => SourceKind::Reload {
            reload_location: raw
                .reload_location
                .ok_or_else(|| SourceError::MissingReloadLocation {
                    number: raw.number.clone(),
                })?,
        },
        other => {
            return Err(SourceError::UnknownType {
                number: raw.number,
                value: other.to_string(),
            });
        }
    };

    Ok(SourceTransaction {
        number: raw.number,
        timestamp,
        posted_date,
        kind,
        amount,
        balance,
        class: raw.class,
        tag_number: raw.tag_number,
    })
}

fn parse_amount(number: &str, field: &'static str, value: &str) -> Result<Milliunits, SourceError> {
    value.parse().map_err(|source| SourceError::InvalidAmount {
        number: number.to_string(),
        field,
        source,
    })
}
