//! Storage backends for the ledger ports.

pub mod in_memory;
