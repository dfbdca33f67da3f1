use anchor_lang::prelude::*;

use crate::state::config::ProtocolConfig;

// ──────────────────────────────────────────────────────
// Initialize Protocol Config — called once by deployer
//
// Creates the singleton ProtocolConfig PDA that stores
// the lock limits, pause switch and admin authority.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    /// The deployer/admin initializing the protocol
    #[account(mut)]
    pub admin: Signer<'info>,

    /// The protocol config PDA — singleton, derived from a fixed seed
    #[account(
        init,
        payer = admin,
        space = ProtocolConfig::LEN,
        seeds = [ProtocolConfig::SEED],
        bump,
    )]
    pub config: Account<'info, ProtocolConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeProtocol>,
    min_lock_amount: u64,
    max_lock_amount: u64,
) -> Result<()> {
    ProtocolConfig::check_limits(min_lock_amount, max_lock_amount)?;

    let config = &mut ctx.accounts.config;
    config.admin = ctx.accounts.admin.key();
    config.min_lock_amount = min_lock_amount;
    config.max_lock_amount = max_lock_amount;
    config.paused = false;
    config.bump = ctx.bumps.config;

    msg!(
        "Protocol initialized: admin={}, min_lock={}, max_lock={}",
        config.admin,
        config.min_lock_amount,
        config.max_lock_amount
    );

    Ok(())
}
