//! Domain types: accounts, transactions, and the storage ports the ledger
//! depends on.

pub mod account;
pub mod ports;
pub mod transaction;
