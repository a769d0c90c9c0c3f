use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{User, Wallet};

// -- JWT Claims --

/// JWT claims issued at login and checked by the bearer middleware.
/// Canonical definition lives here in alms-types so issuance and
/// verification cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

/// Fields are optional so a missing credential answers 400 with a clear
/// message instead of a bare deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// -- Wallet --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub wallet_pin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WalletEnvelope {
    pub message: String,
    pub wallet: Wallet,
}

// -- Donations --

/// `amount` stays a raw JSON value: clients send it as a number or a
/// string, and the transfer engine owns parsing it into a positive integer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    pub beneficiary_username: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub wallet_pin: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateResponse {
    pub message: String,
    pub donor_wallet: Wallet,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
