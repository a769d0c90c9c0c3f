use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            wallet_id   TEXT REFERENCES wallets(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS wallets (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL UNIQUE REFERENCES users(id),
            balance     INTEGER NOT NULL DEFAULT 10000 CHECK (balance >= 0),
            pin         TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS donations (
            id              TEXT PRIMARY KEY,
            donor_id        TEXT NOT NULL REFERENCES users(id),
            beneficiary_id  TEXT NOT NULL REFERENCES users(id),
            amount          INTEGER NOT NULL CHECK (amount > 0),
            created_at      TEXT NOT NULL,
            UNIQUE(donor_id, beneficiary_id, created_at)
        );

        CREATE INDEX IF NOT EXISTS idx_donations_donor
            ON donations(donor_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
