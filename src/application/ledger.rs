use crate::domain::account::{Account, AccountSnapshot};
use crate::domain::ports::{AccountStoreBox, TransactionLogBox};
use crate::domain::transaction::Transaction;
use crate::error::{Party, PaymentError, Result};
use crate::infrastructure::in_memory::{InMemoryAccountStore, InMemoryTransactionLog};
use std::sync::Arc;
use tracing::debug;

/// Registry of accounts plus the append-only transaction log.
///
/// `Ledger` owns both storage backends and implements the transfer algorithm.
/// Populate it (accounts, then transactions) before handing it to a
/// [`Dispatcher`](crate::application::dispatcher::Dispatcher); after that it
/// is shared read-only behind an `Arc` and only balances change.
pub struct Ledger {
    accounts: AccountStoreBox,
    log: TransactionLogBox,
}

impl Ledger {
    /// Creates a new `Ledger` over the given stores.
    ///
    /// # Arguments
    ///
    /// * `accounts` - The account registry.
    /// * `log` - The transaction log.
    pub fn new(accounts: AccountStoreBox, log: TransactionLogBox) -> Self {
        Self { accounts, log }
    }

    /// Ledger backed by the in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(InMemoryAccountStore::new()),
            Box::new(InMemoryTransactionLog::new()),
        )
    }

    /// Registers `account` under its id, silently replacing any account
    /// already registered with the same id.
    pub async fn add_user(&self, account: Account) -> Result<Arc<Account>> {
        let account = Arc::new(account);
        if let Some(previous) = self.accounts.insert(Arc::clone(&account)).await? {
            debug!(
                id = previous.id(),
                name = previous.name(),
                "replaced existing account"
            );
        }
        Ok(account)
    }

    /// Appends `tx` to the log. Validation happens when it is processed.
    pub async fn add_transaction(&self, tx: Transaction) -> Result<()> {
        self.log.append(tx).await
    }

    /// All submitted transactions, in submission order.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.log.get_all().await
    }

    pub async fn account(&self, id: &str) -> Result<Option<Arc<Account>>> {
        self.accounts.get(id).await
    }

    /// All registered accounts, sorted by id.
    pub async fn accounts(&self) -> Result<Vec<Arc<Account>>> {
        let mut accounts = self.accounts.get_all().await?;
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(accounts)
    }

    /// Snapshots of every account, sorted by id.
    pub async fn snapshots(&self) -> Result<Vec<AccountSnapshot>> {
        let mut snapshots = Vec::new();
        for account in self.accounts().await? {
            snapshots.push(account.snapshot().await);
        }
        Ok(snapshots)
    }

    /// Applies a single transfer.
    ///
    /// Both parties are resolved before any balance is touched. The sender is
    /// debited first and the receiver credited afterwards; each step takes
    /// and releases its own account guard, so no two guards are ever held at
    /// once. A failed withdrawal leaves the receiver untouched.
    pub async fn process_transaction(&self, tx: &Transaction) -> Result<()> {
        let sender = self.accounts.get(&tx.from_id).await?;
        let receiver = self.accounts.get(&tx.to_id).await?;

        let (sender, receiver) = match (sender, receiver) {
            (None, _) => return Err(PaymentError::UserNotFound(Party::Sender)),
            (Some(_), None) => return Err(PaymentError::UserNotFound(Party::Receiver)),
            (Some(sender), Some(receiver)) => (sender, receiver),
        };

        sender.withdraw(tx.amount).await?;
        receiver.deposit(tx.amount).await;
        Ok(())
    }
}
