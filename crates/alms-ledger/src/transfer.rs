use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use alms_db::models::{DonationRow, WalletRow};
use alms_db::{Database, queries};

use crate::error::{Entity, LedgerError};
use crate::pin;
use crate::wallet;

/// A donor's completed-donation count at which the thank-you notification
/// fires.
pub const THANK_YOU_MILESTONE: i64 = 2;

pub struct TransferRequest {
    pub beneficiary_username: String,
    pub amount: i64,
    pub pin: String,
}

#[derive(Debug)]
pub struct TransferOutcome {
    /// Donor wallet as committed, balance already debited.
    pub donor_wallet: WalletRow,
    pub donation: DonationRow,
    /// Address for the post-commit thank-you hook.
    pub donor_email: String,
    /// Donor's completed-donation count including this transfer.
    pub completed_count: i64,
}

/// Parse the external amount representation — clients send a JSON integer
/// or a decimal-string integer. Floats and anything else are rejected.
pub fn parse_amount(raw: &serde_json::Value) -> Option<i64> {
    match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Execute one donation, fully or not at all.
///
/// The whole pipeline — party resolution, PIN check, funds check, both
/// balance writes and the ledger entry — runs inside a single IMMEDIATE
/// transaction, so concurrent transfers touching the same wallets
/// serialize and no observer ever sees a debit without its credit.
pub fn execute(
    db: &Database,
    donor_id: &str,
    req: &TransferRequest,
) -> Result<TransferOutcome, LedgerError> {
    if req.amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }

    db.with_tx(|tx| {
        // Resolve parties. Not-found priority: donor, beneficiary, donor
        // wallet, then beneficiary wallet after the funds check.
        let donor =
            queries::user_by_id(tx, donor_id)?.ok_or(LedgerError::NotFound(Entity::Donor))?;
        let beneficiary = queries::user_by_username(tx, &req.beneficiary_username)?
            .ok_or(LedgerError::NotFound(Entity::Beneficiary))?;
        let donor_wallet = queries::wallet_by_user(tx, &donor.id)?
            .ok_or(LedgerError::NotFound(Entity::DonorWallet))?;

        if !pin::verify(&req.pin, &donor_wallet.pin) {
            return Err(LedgerError::WrongPin);
        }

        let donor_balance = wallet::debit(donor_wallet.balance, req.amount)?;

        let beneficiary_wallet = queries::wallet_by_user(tx, &beneficiary.id)?
            .ok_or(LedgerError::NotFound(Entity::BeneficiaryWallet))?;
        let beneficiary_balance = wallet::credit(beneficiary_wallet.balance, req.amount)?;

        if donor_wallet.id == beneficiary_wallet.id {
            // Self-donation: debit and credit net to zero on the one row.
            queries::set_wallet_balance(tx, &donor_wallet.id, donor_wallet.balance)?;
        } else {
            queries::set_wallet_balance(tx, &donor_wallet.id, donor_balance)?;
            queries::set_wallet_balance(tx, &beneficiary_wallet.id, beneficiary_balance)?;
        }

        let donation_id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        queries::insert_donation(
            tx,
            &donation_id,
            &donor.id,
            &beneficiary.id,
            req.amount,
            &created_at,
        )
        .map_err(|e| LedgerError::store(e, "Duplicate donation submission"))?;

        let completed_count = queries::count_donations_by_donor(tx, &donor.id)?;
        let donor_wallet = queries::wallet_by_user(tx, &donor.id)?
            .ok_or(LedgerError::NotFound(Entity::DonorWallet))?;
        let donation = DonationRow {
            id: donation_id,
            donor_id: donor.id,
            beneficiary_id: beneficiary.id,
            amount: req.amount,
            created_at,
        };

        Ok(TransferOutcome {
            donor_wallet,
            donation,
            donor_email: donor.email,
            completed_count,
        })
    })
}
