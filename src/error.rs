use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which side of a transfer failed to resolve against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Sender => f.write_str("sending user"),
            Party::Receiver => f.write_str("receiving user"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0} not found")]
    UserNotFound(Party),
    #[error(
        "not enough balance on account {account}: requested {requested}, available {available}"
    )]
    InsufficientFunds {
        account: String,
        requested: Decimal,
        available: Decimal,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Worker task failed: {0}")]
    WorkerPanicked(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
