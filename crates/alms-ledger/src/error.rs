use std::fmt;

use thiserror::Error;

/// Which record a lookup failed on. Kept as a tag so the priority of
/// not-found answers (donor before beneficiary before wallets) stays an
/// explicit, testable policy rather than an accident of control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Donor,
    Beneficiary,
    DonorWallet,
    BeneficiaryWallet,
    Donation,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::User => "User",
            Entity::Donor => "Donor",
            Entity::Beneficiary => "Beneficiary",
            Entity::DonorWallet => "Donor's wallet",
            Entity::BeneficiaryWallet => "Beneficiary's wallet",
            Entity::Donation => "Donation",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount!")]
    InvalidAmount,
    #[error("Provide {0}!")]
    MissingField(&'static str),
    #[error("Wallet pin must be exactly {} digits", crate::pin::PIN_LENGTH)]
    PinFormat,
    #[error("Invalid wallet pin!")]
    WrongPin,
    #[error("{0} not found!")]
    NotFound(Entity),
    #[error("Insufficient balance!")]
    InsufficientFunds,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl LedgerError {
    /// Classify a storage failure: a uniqueness/CHECK violation is a
    /// permanent conflict, everything else is an internal store error.
    pub fn store(err: anyhow::Error, conflict_msg: &str) -> Self {
        if alms_db::is_constraint_violation(&err) {
            Self::Conflict(conflict_msg.to_string())
        } else {
            Self::Store(err)
        }
    }
}
