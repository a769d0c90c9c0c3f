use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use alms_ledger::LedgerError;
use alms_ledger::wallet::{self, CreateWalletOutcome};
use alms_types::api::{Claims, CreateWalletRequest, WalletEnvelope};

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn create_wallet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(pin) = req.wallet_pin else {
        return Err(LedgerError::MissingField("a wallet pin").into());
    };
    let user_id = claims.sub.to_string();

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        wallet::create_wallet(&db.db, &user_id, &pin)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        anyhow::anyhow!("wallet creation task failed")
    })??;

    let (status, message, row) = match outcome {
        CreateWalletOutcome::Created(row) => {
            (StatusCode::CREATED, "Wallet created successfully", row)
        }
        CreateWalletOutcome::Exists(row) => (StatusCode::OK, "User already has a wallet", row),
    };

    Ok((
        status,
        Json(WalletEnvelope {
            message: message.to_string(),
            wallet: convert::wallet(row),
        }),
    ))
}
