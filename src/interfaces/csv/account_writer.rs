use crate::domain::account::AccountSnapshot;
use crate::error::{PaymentError, Result};
use std::io::Write;

/// Output encoding for final balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Writes account snapshots as `id,name,balance` CSV rows or a JSON array.
///
/// Both formats carry balances at full precision.
pub struct AccountWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn write_accounts<I>(&mut self, accounts: I) -> Result<()>
    where
        I: IntoIterator<Item = AccountSnapshot>,
    {
        match self.format {
            OutputFormat::Csv => {
                let mut csv = csv::Writer::from_writer(&mut self.writer);
                csv.write_record(["id", "name", "balance"])?;
                for account in accounts {
                    let balance = account.balance.value().to_string();
                    csv.write_record([account.id, account.name, balance])?;
                }
                csv.flush()?;
            }
            OutputFormat::Json => {
                let accounts: Vec<AccountSnapshot> = accounts.into_iter().collect();
                serde_json::to_writer_pretty(&mut self.writer, &accounts)
                    .map_err(|e| PaymentError::IoError(e.into()))?;
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }
}
