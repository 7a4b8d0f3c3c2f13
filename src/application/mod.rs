//! Application layer containing the ledger and the worker pool that drains it.
//!
//! `Ledger` applies individual transfers; `Dispatcher` fans a batch of them out
//! to `tokio` worker tasks over a bounded channel.

pub mod dispatcher;
pub mod ledger;
