use anchor_lang::prelude::*;

pub mod address;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod query;
pub mod state;
pub mod validator;

use instructions::*;
use validator::Output;

declare_id!("PayEsc1111111111111111111111111111111111111");

#[program]
pub mod payment_escrow {
    use super::*;

    // ──────────────────────────────────────────────────────
    // PROTOCOL ADMIN
    // ──────────────────────────────────────────────────────

    /// Initialize the protocol config. Called once by the deployer.
    /// Sets the lock limits and admin authority.
    pub fn initialize_protocol(
        ctx: Context<InitializeProtocol>,
        min_lock_amount: u64,
        max_lock_amount: u64,
    ) -> Result<()> {
        instructions::initialize_config::handler(ctx, min_lock_amount, max_lock_amount)
    }

    /// Update protocol config. Admin only.
    /// All fields are optional — pass None to keep current value.
    pub fn update_protocol_config(
        ctx: Context<UpdateProtocolConfig>,
        update: ConfigUpdate,
    ) -> Result<()> {
        instructions::update_config::handler(ctx, update)
    }

    // ──────────────────────────────────────────────────────
    // PAYMENT LIFECYCLE
    // ──────────────────────────────────────────────────────

    /// Lock funds for `recipient` under an off-chain `payment_id`.
    /// The record starts out Pending.
    pub fn lock_payment(
        ctx: Context<LockPayment>,
        amount: u64,
        payment_id: [u8; 32],
    ) -> Result<()> {
        instructions::lock::handler(ctx, amount, payment_id)
    }

    /// Sender forces payout. Payouts to the recipient must cover the amount.
    pub fn execute_payment<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
        instructions::settle::execute_handler(ctx, payouts)
    }

    /// Sender withdraws a Pending payment.
    pub fn cancel_payment<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
        instructions::settle::cancel_handler(ctx, payouts)
    }

    /// Recipient acknowledges receipt.
    pub fn confirm_payment<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
        instructions::settle::confirm_handler(ctx, payouts)
    }
}
