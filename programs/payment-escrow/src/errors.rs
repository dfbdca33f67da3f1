use anchor_lang::prelude::*;

#[error_code]
#[derive(PartialEq, Eq)]
pub enum EscrowError {
    // ── Transition rejections (the only reasons `validate` returns) ──
    #[msg("Payment has already left the Pending state")]
    AlreadyProcessed,

    #[msg("The payment sender did not sign this transaction")]
    UnauthorizedSender,

    #[msg("The payment recipient did not sign this transaction")]
    UnauthorizedRecipient,

    #[msg("Summed payout to the recipient is below the committed amount")]
    InsufficientPayout,

    #[msg("No output is addressed to the recipient")]
    MissingRecipientOutput,

    // ── Lock errors ──
    #[msg("Lock amount must be greater than zero")]
    AmountZero,

    #[msg("Lock amount is below the protocol minimum")]
    BelowMinimumAmount,

    #[msg("Lock amount exceeds the protocol maximum")]
    AboveMaximumAmount,

    #[msg("Payment id is longer than 32 bytes")]
    PaymentIdTooLong,

    // ── Settlement routing errors ──
    #[msg("Payout destination is neither the sender nor the recipient")]
    UnroutablePayout,

    #[msg("Too many payouts in one settlement")]
    TooManyPayouts,

    #[msg("Payouts exceed the funds locked in escrow")]
    InsufficientFunds,

    #[msg("Account does not match the escrow record")]
    RecordMismatch,

    // ── Arithmetic errors ──
    #[msg("Arithmetic overflow")]
    Overflow,

    // ── Protocol config errors ──
    #[msg("Only the protocol admin can perform this action")]
    UnauthorizedAdmin,

    #[msg("Protocol is currently paused")]
    ProtocolPaused,

    #[msg("Minimum lock amount exceeds the maximum")]
    InvalidLockLimits,

    // ── Query errors ──
    #[msg("No escrow record exists at this address")]
    RecordNotFound,

    // ── Settlement routing errors (continued) ──
    #[msg("A recipient token account is required to pay the recipient")]
    RecipientAccountRequired,
}
