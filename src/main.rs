use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payledger::application::dispatcher::{DEFAULT_WORKERS, Dispatcher};
use payledger::application::ledger::Ledger;
use payledger::interfaces::csv::account_reader::AccountReader;
use payledger::interfaces::csv::account_writer::{AccountWriter, OutputFormat};
use payledger::interfaces::csv::transaction_reader::TransactionReader;
use payledger::telemetry;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input transfers CSV file (`from,to,amount`)
    transactions: PathBuf,

    /// Opening accounts CSV file (`id,name,balance`)
    #[arg(long)]
    accounts: PathBuf,

    /// Number of concurrent workers applying transfers
    #[arg(long, env = "PAYLEDGER_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Output format for final balances
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let dispatcher = Dispatcher::new(cli.workers).into_diagnostic()?;
    let ledger = Ledger::in_memory();

    let file = File::open(&cli.accounts).into_diagnostic()?;
    for account in AccountReader::new(file).accounts() {
        match account {
            Ok(account) => {
                ledger.add_user(account).await.into_diagnostic()?;
            }
            Err(e) => warn!("Error reading account: {e}"),
        }
    }

    let file = File::open(&cli.transactions).into_diagnostic()?;
    for tx in TransactionReader::new(file).transactions() {
        match tx {
            Ok(tx) => ledger.add_transaction(tx).await.into_diagnostic()?,
            Err(e) => warn!("Error reading transaction: {e}"),
        }
    }

    let ledger = Arc::new(ledger);
    let report = dispatcher
        .dispatch_pending(Arc::clone(&ledger))
        .await
        .into_diagnostic()?;
    info!(
        processed = report.total(),
        succeeded = report.succeeded,
        failed = report.failed,
        "all transactions attempted"
    );

    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock(), cli.format);
    writer
        .write_accounts(ledger.snapshots().await.into_diagnostic()?)
        .into_diagnostic()?;

    Ok(())
}
