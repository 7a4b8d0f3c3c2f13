use super::account::Account;
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Registry of accounts keyed by id.
///
/// Implementations must allow concurrent readers: once the ledger is
/// populated, every worker looks accounts up through the same registry.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Registers `account`, returning the account it replaced, if any.
    async fn insert(&self, account: Arc<Account>) -> Result<Option<Arc<Account>>>;
    async fn get(&self, id: &str) -> Result<Option<Arc<Account>>>;
    async fn get_all(&self) -> Result<Vec<Arc<Account>>>;
}

/// Append-only log of submitted transactions, in insertion order.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    async fn append(&self, tx: Transaction) -> Result<()>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type TransactionLogBox = Box<dyn TransactionLog>;
