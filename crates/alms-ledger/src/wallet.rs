use anyhow::anyhow;
use uuid::Uuid;

use alms_db::models::WalletRow;
use alms_db::{Database, queries};

use crate::error::{Entity, LedgerError};
use crate::pin;

pub enum CreateWalletOutcome {
    Created(WalletRow),
    /// The user already has a wallet; creation is a no-op and the existing
    /// wallet is returned (answered as 200, not an error).
    Exists(WalletRow),
}

/// Create the user's wallet with the default starting balance and link it
/// back onto the user record, all in one atomic unit.
pub fn create_wallet(
    db: &Database,
    user_id: &str,
    pin: &str,
) -> Result<CreateWalletOutcome, LedgerError> {
    if !pin::is_valid_format(pin) {
        return Err(LedgerError::PinFormat);
    }
    let pin_hash = pin::hash(pin)?;

    db.with_tx(|tx| {
        if let Some(existing) = queries::wallet_by_user(tx, user_id)? {
            return Ok(CreateWalletOutcome::Exists(existing));
        }
        if queries::user_by_id(tx, user_id)?.is_none() {
            // The bearer token outlived the user row.
            return Err(LedgerError::NotFound(Entity::User));
        }

        let wallet_id = Uuid::new_v4().to_string();
        queries::insert_wallet(tx, &wallet_id, user_id, &pin_hash)
            .map_err(|e| LedgerError::store(e, "User already has a wallet"))?;
        queries::set_user_wallet(tx, user_id, &wallet_id)?;

        let wallet = queries::wallet_by_user(tx, user_id)?
            .ok_or_else(|| LedgerError::Store(anyhow!("wallet vanished mid-transaction")))?;
        Ok(CreateWalletOutcome::Created(wallet))
    })
}

/// Pure balance arithmetic. Fails before any store write happens.
pub fn debit(balance: i64, amount: i64) -> Result<i64, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    let next = balance - amount;
    if next < 0 {
        return Err(LedgerError::InsufficientFunds);
    }
    Ok(next)
}

pub fn credit(balance: i64, amount: i64) -> Result<i64, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::Store(anyhow!("wallet balance overflow")))
}
