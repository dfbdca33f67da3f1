use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::config::ProtocolConfig;

// ──────────────────────────────────────────────────────
// Update Protocol Config — admin only
//
// Allows the admin to change lock limits, pause/unpause
// new locks, or transfer admin authority.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
pub struct UpdateProtocolConfig<'info> {
    /// The current admin
    #[account(
        constraint = admin.key() == config.admin @ EscrowError::UnauthorizedAdmin,
    )]
    pub admin: Signer<'info>,

    /// The protocol config PDA
    #[account(
        mut,
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ProtocolConfig>,
}

/// What to update — all fields optional (None = don't change)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub min_lock_amount: Option<u64>,
    pub max_lock_amount: Option<u64>,
    pub paused: Option<bool>,
    pub new_admin: Option<Pubkey>,
}

impl ConfigUpdate {
    /// Applies the update; nothing is written unless the resulting limits are valid.
    pub fn apply(&self, config: &mut ProtocolConfig) -> Result<()> {
        let min_lock_amount = self.min_lock_amount.unwrap_or(config.min_lock_amount);
        let max_lock_amount = self.max_lock_amount.unwrap_or(config.max_lock_amount);
        ProtocolConfig::check_limits(min_lock_amount, max_lock_amount)?;

        if min_lock_amount != config.min_lock_amount || max_lock_amount != config.max_lock_amount {
            msg!("Lock limits updated to {}..={}", min_lock_amount, max_lock_amount);
        }
        config.min_lock_amount = min_lock_amount;
        config.max_lock_amount = max_lock_amount;

        if let Some(paused) = self.paused {
            config.paused = paused;
            msg!("Protocol paused: {}", paused);
        }

        if let Some(new_admin) = self.new_admin {
            msg!(
                "Admin authority transferred from {} to {}",
                config.admin,
                new_admin
            );
            config.admin = new_admin;
        }

        Ok(())
    }
}

pub fn handler(ctx: Context<UpdateProtocolConfig>, update: ConfigUpdate) -> Result<()> {
    update.apply(&mut ctx.accounts.config)
}
