use anchor_lang::prelude::*;

use crate::state::record::EscrowRecord;
use crate::validator::Transition;

// ──────────────────────────────────────────────────────
// Payment Escrow Account — one per locked payment
//
// Wraps the canonical record with the custody details the
// host needs. Settlement overwrites `record` with its
// successor; the account stays readable for status polling.
// ──────────────────────────────────────────────────────

#[account]
pub struct PaymentEscrow {
    // ── Commitment ──
    pub record: EscrowRecord,

    // ── Custody ──
    pub token_mint: Pubkey,   // The single asset this payment is denominated in
    pub escrow_vault: Pubkey, // PDA token account holding the locked funds

    // ── Timing ──
    pub locked_at: i64,
    pub settled_at: i64, // 0 while pending

    // ── PDA ──
    pub bump: u8,
    pub vault_bump: u8,
}

impl PaymentEscrow {
    pub const LEN: usize = 8    // discriminator
        + EscrowRecord::LEN     // record
        + 32 * 2                // pubkeys: token_mint, escrow_vault
        + 8 * 2                 // timestamps: locked_at, settled_at
        + 1                     // bump
        + 1                     // vault_bump
        + 32;                   // padding for future fields

    pub const SEED: &'static [u8] = b"escrow";
    pub const VAULT_SEED: &'static [u8] = b"vault";
    pub const VAULT_AUTHORITY_SEED: &'static [u8] = b"vault_authority";

    /// Replaces the consumed record with its successor.
    pub fn apply(&mut self, transition: &Transition, settled_at: i64) {
        self.record = transition.successor;
        self.settled_at = settled_at;
    }
}
