#![allow(dead_code)]

use payledger::application::ledger::Ledger;
use payledger::domain::account::{Account, Amount, Balance};
use payledger::domain::transaction::Transaction;
use rand::Rng;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub fn write_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn accounts_csv(rows: &[&str]) -> NamedTempFile {
    write_csv("id,name,balance", rows)
}

pub fn transactions_csv(rows: &[&str]) -> NamedTempFile {
    write_csv("from,to,amount", rows)
}

pub fn transfer(from: &str, to: &str, amount: Decimal) -> Transaction {
    Transaction::new(from, to, Amount::new(amount).expect("positive amount"))
}

pub async fn ledger_with(accounts: &[(&str, &str, Decimal)]) -> Ledger {
    let ledger = Ledger::in_memory();
    for (id, name, balance) in accounts {
        ledger
            .add_user(Account::new(*id, *name, Balance::new(*balance)))
            .await
            .unwrap();
    }
    ledger
}

/// Random transfers between `ids`, amounts between 1 and `max_amount` whole units.
/// Sender and receiver are always distinct.
pub fn random_batch(ids: &[&str], size: usize, max_amount: i64) -> Vec<Transaction> {
    let mut rng = rand::thread_rng();
    (0..size)
        .map(|_| {
            let from = rng.gen_range(0..ids.len());
            let mut to = rng.gen_range(0..ids.len() - 1);
            if to >= from {
                to += 1;
            }
            let amount = Decimal::from(rng.gen_range(1..=max_amount));
            transfer(ids[from], ids[to], amount)
        })
        .collect()
}

pub async fn shared_ledger(accounts: &[(&str, &str, Decimal)]) -> Arc<Ledger> {
    Arc::new(ledger_with(accounts).await)
}

pub async fn balance_of(ledger: &Ledger, id: &str) -> Balance {
    let account = ledger.account(id).await.unwrap().unwrap();
    account.balance().await
}

pub async fn total_balance(ledger: &Ledger) -> Decimal {
    ledger
        .snapshots()
        .await
        .unwrap()
        .iter()
        .map(|s| s.balance.value())
        .sum()
}
