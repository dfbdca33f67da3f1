use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::events::PaymentLocked;
use crate::state::config::ProtocolConfig;
use crate::state::escrow::PaymentEscrow;
use crate::state::record::EscrowRecord;

#[derive(Accounts)]
#[instruction(amount: u64, payment_id: [u8; 32])]
pub struct LockPayment<'info> {
    /// The sender locking and funding the payment
    #[account(mut)]
    pub sender: Signer<'info>,

    /// The recipient who will be paid
    /// CHECK: We only store this pubkey; no signature needed at lock time
    pub recipient: UncheckedAccount<'info>,

    /// Protocol config PDA — lock limits and pause switch
    #[account(
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ProtocolConfig>,

    /// The record PDA — derived from sender + payment_id
    #[account(
        init,
        payer = sender,
        space = PaymentEscrow::LEN,
        seeds = [
            PaymentEscrow::SEED,
            sender.key().as_ref(),
            &payment_id,
        ],
        bump,
    )]
    pub escrow: Account<'info, PaymentEscrow>,

    /// The mint of the single asset being escrowed
    pub token_mint: Account<'info, Mint>,

    /// The sender's token account (source of funds)
    #[account(
        mut,
        constraint = sender_token_account.owner == sender.key(),
        constraint = sender_token_account.mint == token_mint.key(),
    )]
    pub sender_token_account: Account<'info, TokenAccount>,

    /// The vault PDA token account (holds funds in custody)
    #[account(
        init,
        payer = sender,
        token::mint = token_mint,
        token::authority = escrow_vault_authority,
        seeds = [PaymentEscrow::VAULT_SEED, escrow.key().as_ref()],
        bump,
    )]
    pub escrow_vault: Account<'info, TokenAccount>,

    /// CHECK: PDA authority over the vault — no data, just a signer seed
    #[account(
        seeds = [PaymentEscrow::VAULT_AUTHORITY_SEED, escrow.key().as_ref()],
        bump,
    )]
    pub escrow_vault_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<LockPayment>, amount: u64, payment_id: [u8; 32]) -> Result<()> {
    ctx.accounts.config.check_lock_amount(amount)?;

    let clock = Clock::get()?;

    // ── Move funds into custody ──
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.sender_token_account.to_account_info(),
            to: ctx.accounts.escrow_vault.to_account_info(),
            authority: ctx.accounts.sender.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    // ── Record the commitment ──
    let escrow = &mut ctx.accounts.escrow;
    escrow.record = EscrowRecord::pending(
        ctx.accounts.sender.key(),
        ctx.accounts.recipient.key(),
        amount,
        payment_id,
    );
    escrow.token_mint = ctx.accounts.token_mint.key();
    escrow.escrow_vault = ctx.accounts.escrow_vault.key();
    escrow.locked_at = clock.unix_timestamp;
    escrow.settled_at = 0;
    escrow.bump = ctx.bumps.escrow;
    escrow.vault_bump = ctx.bumps.escrow_vault;

    emit!(PaymentLocked {
        escrow: escrow.key(),
        sender: escrow.record.sender,
        recipient: escrow.record.recipient,
        amount,
        token_mint: escrow.token_mint,
        payment_id,
        locked_at: clock.unix_timestamp,
    });

    Ok(())
}
