use anchor_lang::prelude::*;

use crate::errors::EscrowError;

// ──────────────────────────────────────────────────────
// Protocol Config — singleton PDA, initialized once by admin
//
// Holds the admin authority, lock limits and the pause switch.
// Only new locks consult it; settlement of an existing record
// never depends on config state.
// ──────────────────────────────────────────────────────

#[account]
pub struct ProtocolConfig {
    /// The admin authority — can update config, transfer authority
    pub admin: Pubkey,

    /// Minimum lock amount (in smallest token unit)
    pub min_lock_amount: u64,

    /// Maximum lock amount (0 = no limit)
    pub max_lock_amount: u64,

    /// Whether new locks are refused (emergency stop)
    pub paused: bool,

    /// PDA bump
    pub bump: u8,
}

impl ProtocolConfig {
    pub const LEN: usize = 8   // discriminator
        + 32                    // admin
        + 8                     // min_lock_amount
        + 8                     // max_lock_amount
        + 1                     // paused
        + 1                     // bump
        + 32;                   // padding for future fields

    /// The PDA seed — only one config account per program
    pub const SEED: &'static [u8] = b"protocol_config";

    pub fn check_limits(min_lock_amount: u64, max_lock_amount: u64) -> Result<()> {
        require!(min_lock_amount > 0, EscrowError::AmountZero);
        if max_lock_amount > 0 {
            require!(
                min_lock_amount <= max_lock_amount,
                EscrowError::InvalidLockLimits
            );
        }
        Ok(())
    }

    pub fn check_lock_amount(&self, amount: u64) -> Result<()> {
        require!(!self.paused, EscrowError::ProtocolPaused);
        require!(amount > 0, EscrowError::AmountZero);
        require!(amount >= self.min_lock_amount, EscrowError::BelowMinimumAmount);
        if self.max_lock_amount > 0 {
            require!(
                amount <= self.max_lock_amount,
                EscrowError::AboveMaximumAmount
            );
        }
        Ok(())
    }
}
