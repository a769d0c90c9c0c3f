use crate::Database;
use crate::models::{DonationRow, UserRow, WalletRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        self.with_conn(|conn| create_user(conn, id, username, email, password_hash))
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_username(conn, username))
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_email(conn, email))
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_id(conn, id))
    }

    // -- Wallets --

    pub fn wallet_by_user(&self, user_id: &str) -> Result<Option<WalletRow>> {
        self.with_conn(|conn| wallet_by_user(conn, user_id))
    }

    // -- Donations --

    pub fn donation_by_id(&self, id: &str) -> Result<Option<DonationRow>> {
        self.with_conn(|conn| donation_by_id(conn, id))
    }

    pub fn donations_by_donor(&self, donor_id: &str, limit: i64, offset: i64) -> Result<Vec<DonationRow>> {
        self.with_conn(|conn| donations_by_donor(conn, donor_id, limit, offset))
    }

    pub fn donations_by_donor_between(
        &self,
        donor_id: &str,
        start: &str,
        end: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DonationRow>> {
        self.with_conn(|conn| donations_by_donor_between(conn, donor_id, start, end, limit, offset))
    }
}

// Free functions over a connection so the transfer engine can issue the
// same queries inside a single transaction.

pub fn create_user(
    conn: &Connection,
    id: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
        (id, username, email, password_hash),
    )?;
    Ok(())
}

pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, wallet_id, created_at
         FROM users WHERE username = ?1",
    )?;
    stmt.query_row([username], user_from_row).optional()
}

pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, wallet_id, created_at
         FROM users WHERE email = ?1",
    )?;
    stmt.query_row([email], user_from_row).optional()
}

pub fn user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, wallet_id, created_at
         FROM users WHERE id = ?1",
    )?;
    stmt.query_row([id], user_from_row).optional()
}

pub fn set_user_wallet(conn: &Connection, user_id: &str, wallet_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE users SET wallet_id = ?1 WHERE id = ?2",
        (wallet_id, user_id),
    )?;
    Ok(())
}

pub fn insert_wallet(conn: &Connection, id: &str, user_id: &str, pin_hash: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO wallets (id, user_id, pin) VALUES (?1, ?2, ?3)",
        (id, user_id, pin_hash),
    )?;
    Ok(())
}

pub fn wallet_by_user(conn: &Connection, user_id: &str) -> Result<Option<WalletRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, balance, pin, created_at FROM wallets WHERE user_id = ?1",
    )?;
    stmt.query_row([user_id], wallet_from_row).optional()
}

pub fn set_wallet_balance(conn: &Connection, wallet_id: &str, balance: i64) -> Result<()> {
    conn.execute(
        "UPDATE wallets SET balance = ?1 WHERE id = ?2",
        (balance, wallet_id),
    )?;
    Ok(())
}

pub fn insert_donation(
    conn: &Connection,
    id: &str,
    donor_id: &str,
    beneficiary_id: &str,
    amount: i64,
    created_at: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO donations (id, donor_id, beneficiary_id, amount, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (id, donor_id, beneficiary_id, amount, created_at),
    )?;
    Ok(())
}

pub fn donation_by_id(conn: &Connection, id: &str) -> Result<Option<DonationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, donor_id, beneficiary_id, amount, created_at
         FROM donations WHERE id = ?1",
    )?;
    stmt.query_row([id], donation_from_row).optional()
}

pub fn donations_by_donor(
    conn: &Connection,
    donor_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<DonationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, donor_id, beneficiary_id, amount, created_at
         FROM donations WHERE donor_id = ?1
         ORDER BY created_at ASC, id ASC
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![donor_id, limit, offset], donation_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn donations_by_donor_between(
    conn: &Connection,
    donor_id: &str,
    start: &str,
    end: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<DonationRow>> {
    // created_at is RFC 3339 UTC, so string comparison is creation order.
    let mut stmt = conn.prepare(
        "SELECT id, donor_id, beneficiary_id, amount, created_at
         FROM donations
         WHERE donor_id = ?1 AND created_at >= ?2 AND created_at <= ?3
         ORDER BY created_at ASC, id ASC
         LIMIT ?4 OFFSET ?5",
    )?;
    let rows = stmt
        .query_map(
            rusqlite::params![donor_id, start, end, limit, offset],
            donation_from_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_donations_by_donor(conn: &Connection, donor_id: &str) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM donations WHERE donor_id = ?1",
        [donor_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        wallet_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn wallet_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<WalletRow, rusqlite::Error> {
    Ok(WalletRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        balance: row.get(2)?,
        pin: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn donation_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<DonationRow, rusqlite::Error> {
    Ok(DonationRow {
        id: row.get(0)?,
        donor_id: row.get(1)?,
        beneficiary_id: row.get(2)?,
        amount: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn seed_two_users(db: &Database) {
        db.with_conn(|conn| {
            create_user(conn, "u1", "alice", "alice@example.com", "hash")?;
            create_user(conn, "u2", "bob", "bob@example.com", "hash")?;
            insert_wallet(conn, "w1", "u1", "pin")?;
            insert_wallet(conn, "w2", "u2", "pin")?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn one_wallet_per_user() {
        let db = Database::open_in_memory().unwrap();
        seed_two_users(&db);

        let err = db
            .with_conn(|conn| insert_wallet(conn, "w3", "u1", "pin"))
            .unwrap_err();
        assert!(crate::is_constraint_violation(&err));
    }

    #[test]
    fn duplicate_donation_tuple_rejected() {
        let db = Database::open_in_memory().unwrap();
        seed_two_users(&db);

        let ts = "2026-08-04T10:00:00.000Z";
        db.with_conn(|conn| insert_donation(conn, "d1", "u1", "u2", 100, ts))
            .unwrap();
        let err = db
            .with_conn(|conn| insert_donation(conn, "d2", "u1", "u2", 100, ts))
            .unwrap_err();
        assert!(crate::is_constraint_violation(&err));
    }

    #[test]
    fn donor_listing_pages_in_creation_order() {
        let db = Database::open_in_memory().unwrap();
        seed_two_users(&db);

        db.with_conn(|conn| {
            for i in 0..25 {
                let ts = format!("2026-08-04T10:00:{:02}.000Z", i);
                insert_donation(conn, &format!("d{}", i), "u1", "u2", i + 1, &ts)?;
            }
            Ok(())
        })
        .unwrap();

        // Page 2 of 10 is records 11-20.
        let page = db.donations_by_donor("u1", 10, 10).unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].amount, 11);
        assert_eq!(page[9].amount, 20);
    }

    #[test]
    fn period_bounds_are_inclusive() {
        let db = Database::open_in_memory().unwrap();
        seed_two_users(&db);

        db.with_conn(|conn| {
            insert_donation(conn, "d1", "u1", "u2", 1, "2026-08-01T00:00:00.000Z")?;
            insert_donation(conn, "d2", "u1", "u2", 2, "2026-08-02T12:00:00.000Z")?;
            insert_donation(conn, "d3", "u1", "u2", 3, "2026-08-03T00:00:00.000Z")?;
            Ok(())
        })
        .unwrap();

        let rows = db
            .donations_by_donor_between(
                "u1",
                "2026-08-01T00:00:00.000Z",
                "2026-08-03T00:00:00.000Z",
                10,
                0,
            )
            .unwrap();
        assert_eq!(rows.len(), 3);

        let rows = db
            .donations_by_donor_between(
                "u1",
                "2026-08-02T00:00:00.000Z",
                "2026-08-02T23:59:59.999Z",
                10,
                0,
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 2);
    }
}
