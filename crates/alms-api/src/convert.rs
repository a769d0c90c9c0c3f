//! Row → API model conversion. Rows keep SQLite's string typing; anything
//! corrupt is logged and replaced with a default rather than failing the
//! whole response.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use alms_db::models::{DonationRow, UserRow, WalletRow};
use alms_types::models::{Donation, User, Wallet};

pub fn user(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        username: row.username,
        email: row.email,
    }
}

pub fn wallet(row: WalletRow) -> Wallet {
    Wallet {
        id: parse_id(&row.id, "wallet"),
        user_id: parse_id(&row.user_id, "user"),
        balance: row.balance,
        created_at: parse_timestamp(&row.created_at, &row.id),
    }
}

pub fn donation(row: DonationRow) -> Donation {
    Donation {
        id: parse_id(&row.id, "donation"),
        donor_id: parse_id(&row.donor_id, "user"),
        beneficiary_id: parse_id(&row.beneficiary_id, "user"),
        amount: row.amount,
        created_at: parse_timestamp(&row.created_at, &row.id),
    }
}

fn parse_id(raw: &str, kind: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", kind, raw, e);
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str, record_id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores its defaults as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on '{}': {}", raw, record_id, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_both_stored_formats() {
        let rfc = parse_timestamp("2026-08-04T10:00:00.123Z", "r");
        assert_eq!(rfc.timestamp_subsec_millis(), 123);

        let sqlite = parse_timestamp("2026-08-04 10:00:00", "r");
        assert_eq!(sqlite.to_rfc3339(), "2026-08-04T10:00:00+00:00");

        assert_eq!(parse_timestamp("garbage", "r"), DateTime::<Utc>::default());
    }
}
