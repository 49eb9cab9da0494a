//! cardsync-ingest: transit-card provider connector (wire decoding + HTTP client).

pub mod client;
pub mod error;
pub mod wire;

pub use client::SourceClient;
pub use error::SourceError;
pub use wire::{RawTransaction, decode, decode_body, query_params};
