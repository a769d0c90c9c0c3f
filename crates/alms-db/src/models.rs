/// Database row types — these map directly to SQLite rows.
/// Distinct from alms-types API models to keep the DB layer independent.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub wallet_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug)]
pub struct WalletRow {
    pub id: String,
    pub user_id: String,
    pub balance: i64,
    pub pin: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct DonationRow {
    pub id: String,
    pub donor_id: String,
    pub beneficiary_id: String,
    pub amount: i64,
    pub created_at: String,
}
