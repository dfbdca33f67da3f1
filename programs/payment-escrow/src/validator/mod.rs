//! The transition validator.
//!
//! `validate` is a pure function of the record being consumed, the requested
//! action and the proposed transaction's outputs and signers. It performs no
//! I/O and reads no ambient state; signature verification, atomicity and
//! single consumption of a record are guarantees of the host that calls it.

use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::enums::{Action, PaymentStatus};
use crate::state::record::EscrowRecord;

pub mod predicates;

use predicates::{is_signed_by, require_payout, require_pending};

/// One value output of the proposed transaction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Output {
    pub destination: Pubkey,
    pub amount: u64,
}

/// Read-only view of the proposed transaction.
#[derive(Clone, Copy, Debug)]
pub struct TransactionContext<'a> {
    pub outputs: &'a [Output],
    pub signers: &'a [Pubkey],
}

/// An accepted transition: the consumed record and the one replacing it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub action: Action,
    pub consumed: EscrowRecord,
    pub successor: EscrowRecord,
}

impl Transition {
    pub fn status(&self) -> PaymentStatus {
        self.successor.status
    }
}

/// Decides whether `action` may consume `record` given `tx`.
///
/// Every arm re-checks `Pending` on its own. Checks run status, outputs,
/// then signers; the order only affects which reason is reported.
///
/// Any change to what this accepts must bump
/// [`crate::address::VALIDATOR_VERSION`].
pub fn validate(
    record: &EscrowRecord,
    action: Action,
    tx: &TransactionContext<'_>,
) -> std::result::Result<Transition, EscrowError> {
    match action {
        Action::Execute => {
            require_pending(record.status)?;
            require_payout(tx.outputs, &record.recipient, record.amount)?;
            if !is_signed_by(tx.signers, &record.sender) {
                return Err(EscrowError::UnauthorizedSender);
            }
        }
        Action::Cancel => {
            require_pending(record.status)?;
            if !is_signed_by(tx.signers, &record.sender) {
                return Err(EscrowError::UnauthorizedSender);
            }
        }
        Action::Confirm => {
            require_pending(record.status)?;
            if !is_signed_by(tx.signers, &record.recipient) {
                return Err(EscrowError::UnauthorizedRecipient);
            }
        }
    }

    Ok(Transition {
        action,
        consumed: *record,
        successor: record.successor(action.target_status()),
    })
}

/// Boolean form of `validate` for callers that only need accept/reject.
pub fn is_authorized(record: &EscrowRecord, action: Action, tx: &TransactionContext<'_>) -> bool {
    validate(record, action, tx).is_ok()
}
