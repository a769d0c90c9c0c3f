//! Donation ledger core: wallet rules, the transfer engine, and history
//! queries. Everything that mutates a balance goes through [`transfer`],
//! inside one storage transaction.

pub mod error;
pub mod history;
pub mod pin;
pub mod transfer;
pub mod wallet;

pub use error::{Entity, LedgerError};
