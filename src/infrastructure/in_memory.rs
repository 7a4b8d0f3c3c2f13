use crate::domain::account::Account;
use crate::domain::ports::{AccountStore, TransactionLog};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory account registry.
///
/// Uses `Arc<RwLock<HashMap<String, Arc<Account>>>>` so lookups from many
/// workers proceed in parallel. The lock only guards the map; balances are
/// protected by each account's own guard.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Arc<Account>>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Arc<Account>) -> Result<Option<Arc<Account>>> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.insert(account.id().to_string(), account))
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}

/// A thread-safe in-memory transaction log.
#[derive(Default, Clone)]
pub struct InMemoryTransactionLog {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionLog {
    /// Creates a new, empty in-memory transaction log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionLog for InMemoryTransactionLog {
    async fn append(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.push(tx);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.clone())
    }
}
