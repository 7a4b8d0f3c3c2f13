use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads transfer requests from a CSV source with a `from,to,amount` header.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Transaction>`.
/// It handles whitespace trimming automatically; rows with a non-positive
/// amount come back as errors.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
