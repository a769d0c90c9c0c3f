pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests. No WAL (memory databases don't
    /// support it), same schema and constraints as `open`.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` inside a single IMMEDIATE transaction: every read and write
    /// in the closure applies together or not at all. `Ok` commits; any
    /// `Err` (or an abandoned transaction) rolls back with no partial state
    /// visible to other callers. Conflicting units serialize on the write
    /// lock taken up front.
    pub fn with_tx<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| anyhow::Error::from(e))?;

        let out = f(&tx)?;

        tx.commit().map_err(|e| anyhow::Error::from(e))?;
        Ok(out)
    }
}

/// True when `err` is a SQLite uniqueness/CHECK constraint failure — the
/// permanent, not-retried class of store error.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_tx_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            queries::create_user(conn, "u1", "alice", "alice@example.com", "hash")?;
            queries::insert_wallet(conn, "w1", "u1", "pin-hash")?;
            Ok(())
        })
        .unwrap();

        // Debit applied, then the unit fails: nothing may stick.
        let res: Result<(), anyhow::Error> = db.with_tx(|tx| {
            queries::set_wallet_balance(tx, "w1", 4_000)?;
            anyhow::bail!("simulated store fault")
        });
        assert!(res.is_err());

        let wallet = db.wallet_by_user("u1").unwrap().unwrap();
        assert_eq!(wallet.balance, 10_000);
    }

    #[test]
    fn with_tx_commits_on_ok() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            queries::create_user(conn, "u1", "alice", "alice@example.com", "hash")?;
            queries::insert_wallet(conn, "w1", "u1", "pin-hash")?;
            Ok(())
        })
        .unwrap();

        db.with_tx(|tx| queries::set_wallet_balance(tx, "w1", 4_000))
            .unwrap();

        let wallet = db.wallet_by_user("u1").unwrap().unwrap();
        assert_eq!(wallet.balance, 4_000);
    }

    #[test]
    fn negative_balance_rejected_by_store() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            queries::create_user(conn, "u1", "alice", "alice@example.com", "hash")?;
            queries::insert_wallet(conn, "w1", "u1", "pin-hash")?;
            Ok(())
        })
        .unwrap();

        let res: Result<(), anyhow::Error> =
            db.with_tx(|tx| queries::set_wallet_balance(tx, "w1", -1));
        assert!(res.is_err());
        assert!(is_constraint_violation(&res.unwrap_err()));

        let wallet = db.wallet_by_user("u1").unwrap().unwrap();
        assert_eq!(wallet.balance, 10_000);
    }
}
