use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::enums::PaymentStatus;
use crate::validator::Output;

pub fn require_pending(status: PaymentStatus) -> std::result::Result<(), EscrowError> {
    match status {
        PaymentStatus::Pending => Ok(()),
        PaymentStatus::Confirmed | PaymentStatus::Cancelled => Err(EscrowError::AlreadyProcessed),
    }
}

/// Set membership; co-signers beyond `required` are ignored.
pub fn is_signed_by(signers: &[Pubkey], required: &Pubkey) -> bool {
    signers.iter().any(|signer| signer == required)
}

/// Total paid to `destination` across every output addressed to it,
/// or `None` when no output names it at all.
///
/// Accumulates in `u128` so a split payout can never wrap.
pub fn payout_to(outputs: &[Output], destination: &Pubkey) -> Option<u128> {
    outputs
        .iter()
        .filter(|output| output.destination == *destination)
        .fold(None, |total, output| {
            Some(total.unwrap_or(0) + u128::from(output.amount))
        })
}

/// Recipient must appear among the outputs and be paid at least `amount` in total.
pub fn require_payout(
    outputs: &[Output],
    recipient: &Pubkey,
    amount: u64,
) -> std::result::Result<(), EscrowError> {
    let paid = payout_to(outputs, recipient).ok_or(EscrowError::MissingRecipientOutput)?;
    if paid < u128::from(amount) {
        return Err(EscrowError::InsufficientPayout);
    }
    Ok(())
}
