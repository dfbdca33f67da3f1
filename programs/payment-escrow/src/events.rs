use anchor_lang::prelude::*;
use crate::state::enums::*;

// ──────────────────────────────────────────────────────
// Events — emitted for off-chain indexing
//
// `payment_id` is repeated on every event so job trackers can
// correlate without fetching the record.
// ──────────────────────────────────────────────────────

#[event]
pub struct PaymentLocked {
    pub escrow: Pubkey,
    pub sender: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub token_mint: Pubkey,
    pub payment_id: [u8; 32],
    pub locked_at: i64,
}

#[event]
pub struct PaymentSettled {
    pub escrow: Pubkey,
    pub action: Action,
    pub status: PaymentStatus,
    pub payment_id: [u8; 32],
    pub paid_to_recipient: u64,
    pub refunded_to_sender: u64,
    pub settled_at: i64,
}
