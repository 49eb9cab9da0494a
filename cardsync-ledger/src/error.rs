use reqwest::StatusCode;
use thiserror::Error;

/// Ledger failures. Submission outcomes keep validation errors, duplicate
/// imports and everything else apart.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger request failed")]
    Transport(#[from] reqwest::Error),
    #[error("the request could not be understood due to malformed syntax or validation error(s): {body}")]
    Validation { body: String },
    #[error("a transaction on the same account with the same import_id already exists: {body}")]
    DuplicateImport { body: String },
    #[error("unknown error (status {status}): {body}")]
    Unknown { status: StatusCode, body: String },
    #[error("ledger returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("access token is not a valid header value")]
    InvalidToken,
    #[error("malformed ledger response")]
    Decode(#[from] serde_json::Error),
}

/// Maps a bulk-create response onto an outcome. Only `201 Created` is success.
pub fn classify_submission(status: StatusCode, body: String) -> Result<(), LedgerError> {
    match status {
        StatusCode::CREATED => Ok(()),
        StatusCode::BAD_REQUEST => Err(LedgerError::Validation { body }),
        StatusCode::CONFLICT => Err(LedgerError::DuplicateImport { body }),
        status => Err(LedgerError::Unknown { status, body }),
    }
}
