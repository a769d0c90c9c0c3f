use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use alms_db::Database;
use alms_db::models::DonationRow;

use crate::error::{Entity, LedgerError};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Offset pagination with out-of-range values clamped, not rejected.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    page: i64,
    limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Donations are visible only to their donor; anyone else gets the same
/// not-found answer as a missing id.
pub fn get_by_id(
    db: &Database,
    donation_id: &str,
    requestor_id: &str,
) -> Result<DonationRow, LedgerError> {
    match db.donation_by_id(donation_id)? {
        Some(d) if d.donor_id == requestor_id => Ok(d),
        _ => Err(LedgerError::NotFound(Entity::Donation)),
    }
}

/// Creation order (oldest first), id as tiebreak for equal timestamps.
pub fn list_by_donor(
    db: &Database,
    donor_id: &str,
    page: Page,
) -> Result<Vec<DonationRow>, LedgerError> {
    Ok(db.donations_by_donor(donor_id, page.limit(), page.offset())?)
}

pub fn list_by_donor_in_period(
    db: &Database,
    donor_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    page: Page,
) -> Result<Vec<DonationRow>, LedgerError> {
    let start = start.to_rfc3339_opts(SecondsFormat::Millis, true);
    let end = end.to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(db.donations_by_donor_between(donor_id, &start, &end, page.limit(), page.offset())?)
}

/// Period bounds accept RFC 3339 instants or bare dates (midnight UTC).
pub fn parse_date_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alms_db::queries;

    fn seed(db: &Database, donations: usize) {
        db.with_conn(|conn| {
            queries::create_user(conn, "u1", "alice", "alice@example.com", "hash")?;
            queries::create_user(conn, "u2", "bob", "bob@example.com", "hash")?;
            for i in 0..donations {
                let ts = format!("2026-08-04T10:00:{:02}.000Z", i);
                queries::insert_donation(
                    conn,
                    &format!("d{}", i),
                    "u1",
                    "u2",
                    (i + 1) as i64,
                    &ts,
                )?;
            }
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn page_clamping() {
        let p = Page::new(None, None);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(p.offset(), 0);

        let p = Page::new(Some(0), Some(0));
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);

        let p = Page::new(Some(-3), Some(-7));
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);

        let p = Page::new(Some(2), Some(10));
        assert_eq!(p.offset(), 10);

        let p = Page::new(Some(1), Some(100_000));
        assert_eq!(p.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn get_by_id_is_donor_only() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 1);

        let d = get_by_id(&db, "d0", "u1").unwrap();
        assert_eq!(d.amount, 1);
        // Identical reads absent intervening writes.
        let again = get_by_id(&db, "d0", "u1").unwrap();
        assert_eq!(again.id, d.id);
        assert_eq!(again.created_at, d.created_at);

        // The beneficiary has no symmetric read access.
        assert!(matches!(
            get_by_id(&db, "d0", "u2"),
            Err(LedgerError::NotFound(Entity::Donation))
        ));
        assert!(matches!(
            get_by_id(&db, "missing", "u1"),
            Err(LedgerError::NotFound(Entity::Donation))
        ));
    }

    #[test]
    fn listing_pages_deterministically() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 25);

        let page2 = list_by_donor(&db, "u1", Page::new(Some(2), Some(10))).unwrap();
        assert_eq!(page2.len(), 10);
        assert_eq!(page2[0].amount, 11);
        assert_eq!(page2[9].amount, 20);

        let tail = list_by_donor(&db, "u1", Page::new(Some(3), Some(10))).unwrap();
        assert_eq!(tail.len(), 5);
    }

    #[test]
    fn date_bound_parsing() {
        let d = parse_date_bound("2026-08-04").unwrap();
        assert_eq!(d.to_rfc3339_opts(SecondsFormat::Secs, true), "2026-08-04T00:00:00Z");

        let d = parse_date_bound("2026-08-04T10:30:00Z").unwrap();
        assert_eq!(d.to_rfc3339_opts(SecondsFormat::Secs, true), "2026-08-04T10:30:00Z");

        // Offsets normalize to UTC.
        let d = parse_date_bound("2026-08-04T10:30:00+02:00").unwrap();
        assert_eq!(d.to_rfc3339_opts(SecondsFormat::Secs, true), "2026-08-04T08:30:00Z");

        assert!(parse_date_bound("yesterday").is_none());
        assert!(parse_date_bound("").is_none());
        assert!(parse_date_bound("2026-13-40").is_none());
    }

    #[test]
    fn period_listing_is_inclusive() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 10);

        let start = parse_date_bound("2026-08-04T10:00:03Z").unwrap();
        let end = parse_date_bound("2026-08-04T10:00:06Z").unwrap();
        let rows =
            list_by_donor_in_period(&db, "u1", start, end, Page::new(None, None)).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].amount, 4);
        assert_eq!(rows[3].amount, 7);
    }
}
