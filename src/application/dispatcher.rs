use crate::application::ledger::Ledger;
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_channel::{Receiver, bounded};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Pool size used when none is configured.
pub const DEFAULT_WORKERS: usize = 2;

/// Outcome of a dispatched batch.
///
/// Failed transactions are counted, never returned as errors: a batch always
/// completes once every transaction has been attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Transactions handled by each worker, indexed by worker id.
    pub processed_per_worker: Vec<usize>,
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchReport {
    /// Number of transactions attempted across all workers.
    pub fn total(&self) -> usize {
        self.processed_per_worker.iter().sum()
    }
}

#[derive(Debug, Default)]
struct WorkerStats {
    processed: usize,
    succeeded: usize,
    failed: usize,
}

/// Fans a batch of transactions out to a fixed pool of worker tasks.
///
/// The batch is loaded into a bounded queue sized to fit it, the queue is
/// closed, and the workers drain it concurrently. Each transaction is
/// received by exactly one worker. Application order across workers is not
/// deterministic; a single worker applies transactions in queue order.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    workers: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Dispatcher {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(PaymentError::ValidationError(
                "Worker pool needs at least one worker".to_string(),
            ));
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Processes every transaction in the ledger's log.
    pub async fn dispatch_pending(&self, ledger: Arc<Ledger>) -> Result<DispatchReport> {
        let batch = ledger.transactions().await?;
        self.dispatch(ledger, batch).await
    }

    /// Processes `batch` against `ledger` and waits for every worker to exit.
    ///
    /// A panicking worker does not stop the others: the queue is still
    /// drained by the survivors, and `WorkerPanicked` is returned only after
    /// every worker has exited.
    pub async fn dispatch(
        &self,
        ledger: Arc<Ledger>,
        batch: Vec<Transaction>,
    ) -> Result<DispatchReport> {
        let (sender, receiver) = bounded(batch.len().max(1));
        let batch_size = batch.len();
        for tx in batch {
            sender
                .send(tx)
                .await
                .map_err(|e| PaymentError::ValidationError(format!("Queue closed: {e}")))?;
        }
        sender.close();

        info!(
            transactions = batch_size,
            workers = self.workers,
            "dispatching batch"
        );

        let mut pool = JoinSet::new();
        for worker_id in 0..self.workers {
            let ledger = Arc::clone(&ledger);
            let receiver = receiver.clone();
            pool.spawn(async move {
                let stats = run_worker(worker_id, ledger, receiver).await;
                (worker_id, stats)
            });
        }
        drop(receiver);

        let mut report = DispatchReport {
            processed_per_worker: vec![0; self.workers],
            ..Default::default()
        };
        let mut panics = Vec::new();
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok((worker_id, stats)) => {
                    report.processed_per_worker[worker_id] = stats.processed;
                    report.succeeded += stats.succeeded;
                    report.failed += stats.failed;
                }
                Err(e) => {
                    error!("Worker task failed: {e}");
                    panics.push(e.to_string());
                }
            }
        }

        if !panics.is_empty() {
            return Err(PaymentError::WorkerPanicked(panics.join("; ")));
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "batch complete"
        );
        Ok(report)
    }
}

async fn run_worker(
    worker_id: usize,
    ledger: Arc<Ledger>,
    receiver: Receiver<Transaction>,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while let Ok(tx) = receiver.recv().await {
        stats.processed += 1;
        info!(
            worker = worker_id,
            "Processing transaction from {} to {} for amount {}",
            tx.from_id,
            tx.to_id,
            tx.amount
        );

        match ledger.process_transaction(&tx).await {
            Ok(()) => {
                stats.succeeded += 1;
                log_balances(&ledger).await;
            }
            Err(e) => {
                stats.failed += 1;
                warn!(
                    worker = worker_id,
                    from = %tx.from_id,
                    to = %tx.to_id,
                    "Transaction failed: {e}"
                );
            }
        }
    }

    debug!(
        worker = worker_id,
        processed = stats.processed,
        "worker finished"
    );
    stats
}

async fn log_balances(ledger: &Ledger) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    match ledger.snapshots().await {
        Ok(snapshots) => {
            for snapshot in snapshots {
                debug!("{}'s balance: {}", snapshot.name, snapshot.balance);
            }
        }
        Err(e) => warn!("Could not read balances: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Account, Amount, Balance};
    use crate::domain::ports::AccountStore;
    use crate::infrastructure::in_memory::{InMemoryAccountStore, InMemoryTransactionLog};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn transfer(from: &str, to: &str, amount: Decimal) -> Transaction {
        Transaction::new(from, to, Amount::new(amount).unwrap())
    }

    async fn populate(ledger: &Ledger, accounts: &[(&str, &str, Decimal)]) {
        for (id, name, balance) in accounts {
            ledger
                .add_user(Account::new(*id, *name, Balance::new(*balance)))
                .await
                .unwrap();
        }
    }

    async fn ledger_with(accounts: &[(&str, &str, Decimal)]) -> Arc<Ledger> {
        let ledger = Ledger::in_memory();
        populate(&ledger, accounts).await;
        Arc::new(ledger)
    }

    /// Account store whose lookups of `"boom"` panic the calling task.
    #[derive(Default)]
    struct PanickingStore {
        inner: InMemoryAccountStore,
    }

    #[async_trait]
    impl AccountStore for PanickingStore {
        async fn insert(&self, account: Arc<Account>) -> Result<Option<Arc<Account>>> {
            self.inner.insert(account).await
        }

        async fn get(&self, id: &str) -> Result<Option<Arc<Account>>> {
            if id == "boom" {
                panic!("lookup of {id} failed");
            }
            self.inner.get(id).await
        }

        async fn get_all(&self) -> Result<Vec<Arc<Account>>> {
            self.inner.get_all().await
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            Dispatcher::new(0),
            Err(PaymentError::ValidationError(_))
        ));
        assert_eq!(Dispatcher::default().workers(), DEFAULT_WORKERS);
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let ledger = ledger_with(&[]).await;
        let report = Dispatcher::new(3)
            .unwrap()
            .dispatch(ledger, vec![])
            .await
            .unwrap();

        assert_eq!(report.total(), 0);
        assert_eq!(report.processed_per_worker, vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_propagated() {
        let accounts = [("1", "Alice", dec!(10)), ("2", "Bob", dec!(0))];
        let ledger = ledger_with(&accounts).await;
        let batch = vec![
            transfer("1", "2", dec!(5)),
            transfer("404", "2", dec!(5)),
            transfer("2", "1", dec!(50)),
        ];

        let report = Dispatcher::new(1)
            .unwrap()
            .dispatch(Arc::clone(&ledger), batch)
            .await
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        let alice = ledger.account("1").await.unwrap().unwrap();
        assert_eq!(alice.balance().await, Balance::new(dec!(5)));
    }

    #[tokio::test]
    async fn test_single_worker_applies_in_log_order() {
        let accounts = [("1", "Alice", dec!(100.00)), ("2", "Bob", dec!(50.00))];
        let ledger = ledger_with(&accounts).await;
        ledger
            .add_transaction(transfer("1", "2", dec!(30.00)))
            .await
            .unwrap();
        ledger
            .add_transaction(transfer("1", "2", dec!(100.00)))
            .await
            .unwrap();

        let report = Dispatcher::new(1)
            .unwrap()
            .dispatch_pending(Arc::clone(&ledger))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        let snapshots = ledger.snapshots().await.unwrap();
        assert_eq!(snapshots[0].balance, Balance::new(dec!(70.00)));
        assert_eq!(snapshots[1].balance, Balance::new(dec!(80.00)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_transaction_processed_once() {
        let accounts = [("1", "Alice", dec!(1000)), ("2", "Bob", dec!(1000))];
        let ledger = ledger_with(&accounts).await;
        let batch: Vec<Transaction> = (0..200)
            .map(|i| {
                let (from, to) = if i % 2 == 0 { ("1", "2") } else { ("2", "1") };
                transfer(from, to, dec!(1))
            })
            .collect();

        let report = Dispatcher::new(4)
            .unwrap()
            .dispatch(Arc::clone(&ledger), batch)
            .await
            .unwrap();

        assert_eq!(report.processed_per_worker.len(), 4);
        assert_eq!(report.total(), 200);
        assert_eq!(report.succeeded + report.failed, 200);
        assert_eq!(report.succeeded, 200);

        let total: Decimal = ledger
            .snapshots()
            .await
            .unwrap()
            .iter()
            .map(|s| s.balance.value())
            .sum();
        assert_eq!(total, dec!(2000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_worker_panic_leaves_queue_drained() {
        let ledger = Ledger::new(
            Box::new(PanickingStore::default()),
            Box::new(InMemoryTransactionLog::new()),
        );
        let accounts = [("1", "Alice", dec!(100)), ("2", "Bob", dec!(0))];
        populate(&ledger, &accounts).await;
        let ledger = Arc::new(ledger);

        let mut batch = vec![transfer("boom", "2", dec!(1))];
        batch.extend((0..50).map(|_| transfer("1", "2", dec!(1))));

        let result = Dispatcher::new(2)
            .unwrap()
            .dispatch(Arc::clone(&ledger), batch)
            .await;

        assert!(matches!(result, Err(PaymentError::WorkerPanicked(_))));
        let alice = ledger.account("1").await.unwrap().unwrap();
        let bob = ledger.account("2").await.unwrap().unwrap();
        assert_eq!(alice.balance().await, Balance::new(dec!(50)));
        assert_eq!(bob.balance().await, Balance::new(dec!(50)));
    }
}
