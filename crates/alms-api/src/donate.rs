use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, warn};

use alms_ledger::LedgerError;
use alms_ledger::transfer::{self, THANK_YOU_MILESTONE, TransferRequest};
use alms_types::api::{Claims, DonateRequest, DonateResponse};

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn donate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<DonateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(beneficiary_username) = req.beneficiary_username else {
        return Err(LedgerError::MissingField("a beneficiary username").into());
    };
    let Some(raw_amount) = req.amount else {
        return Err(LedgerError::MissingField("an amount").into());
    };
    let Some(pin) = req.wallet_pin else {
        return Err(LedgerError::MissingField("a wallet pin").into());
    };
    let amount = transfer::parse_amount(&raw_amount).ok_or(LedgerError::InvalidAmount)?;

    let donor_id = claims.sub.to_string();
    let transfer_req = TransferRequest {
        beneficiary_username,
        amount,
        pin,
    };

    // The whole pipeline is blocking (DB transaction + argon2), so run it
    // off the async runtime.
    let db = state.clone();
    let outcome =
        tokio::task::spawn_blocking(move || transfer::execute(&db.db, &donor_id, &transfer_req))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow::anyhow!("transfer task failed")
            })??;

    // Post-commit hook, outside the transactional boundary: fire and
    // forget, a failed send never changes the transfer's outcome.
    if outcome.completed_count >= THANK_YOU_MILESTONE {
        let notifier = state.notifier.clone();
        let email = outcome.donor_email.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_thank_you(&email).await {
                warn!("Thank-you notification failed: {}", e);
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(DonateResponse {
            message: "Donation successful".to_string(),
            donor_wallet: convert::wallet(outcome.donor_wallet),
        }),
    ))
}
