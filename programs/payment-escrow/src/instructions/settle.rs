use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount, Transfer};

use crate::errors::EscrowError;
use crate::events::PaymentSettled;
use crate::state::enums::Action;
use crate::state::escrow::PaymentEscrow;
use crate::state::record::EscrowRecord;
use crate::validator::{validate, Output, TransactionContext, Transition};

// ──────────────────────────────────────────────────────
// Settle Payment — Execute / Cancel / Confirm
//
// The instruction's payouts are the proposed transaction's
// outputs and every account that signed it is a signer. The
// validator decides; a rejection aborts the whole transaction.
// On accept the vault is drained along the routed payouts, then
// closed, and the record is replaced by its successor. Later
// attempts on the same record never touch the vault and are
// rejected by the validator.
// ──────────────────────────────────────────────────────

pub const MAX_PAYOUTS: usize = 8;

#[derive(Accounts)]
pub struct SettlePayment<'info> {
    /// The record being consumed
    #[account(
        mut,
        seeds = [
            PaymentEscrow::SEED,
            escrow.record.sender.as_ref(),
            escrow.record.payment_id.as_ref(),
        ],
        bump = escrow.bump,
    )]
    pub escrow: Account<'info, PaymentEscrow>,

    /// CHECK: bound to the record's sender; receives refunds and vault rent.
    /// Whether it signed is decided by the validator, not here.
    #[account(
        mut,
        address = escrow.record.sender @ EscrowError::RecordMismatch,
    )]
    pub sender: UncheckedAccount<'info>,

    /// CHECK: bound to the record's recipient; signature optional
    #[account(address = escrow.record.recipient @ EscrowError::RecordMismatch)]
    pub recipient: UncheckedAccount<'info>,

    /// CHECK: the vault holding the locked funds. Closed by the first
    /// accepted settlement, so it is only read after `validate` accepts.
    #[account(
        mut,
        address = escrow.escrow_vault @ EscrowError::RecordMismatch,
    )]
    pub escrow_vault: UncheckedAccount<'info>,

    /// CHECK: PDA authority over the vault
    #[account(
        seeds = [PaymentEscrow::VAULT_AUTHORITY_SEED, escrow.key().as_ref()],
        bump,
    )]
    pub escrow_vault_authority: UncheckedAccount<'info>,

    /// Sender's token account for refunds
    #[account(
        mut,
        constraint = sender_token_account.owner == escrow.record.sender @ EscrowError::RecordMismatch,
        constraint = sender_token_account.mint == escrow.token_mint @ EscrowError::RecordMismatch,
    )]
    pub sender_token_account: Account<'info, TokenAccount>,

    /// Recipient's token account; only needed when the recipient is paid
    #[account(
        mut,
        constraint = recipient_token_account.owner == escrow.record.recipient @ EscrowError::RecordMismatch,
        constraint = recipient_token_account.mint == escrow.token_mint @ EscrowError::RecordMismatch,
    )]
    pub recipient_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Where the vault's balance goes once a transition is accepted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Routing {
    pub to_recipient: u64,
    pub to_sender: u64,
}

/// Maps the proposed outputs onto the two accounts this host can pay.
/// Whatever the outputs leave unassigned is refunded to the sender.
pub fn route_payouts(record: &EscrowRecord, payouts: &[Output], locked: u64) -> Result<Routing> {
    require!(payouts.len() <= MAX_PAYOUTS, EscrowError::TooManyPayouts);

    let mut routing = Routing::default();
    for payout in payouts {
        let slot = if payout.destination == record.recipient {
            &mut routing.to_recipient
        } else if payout.destination == record.sender {
            &mut routing.to_sender
        } else {
            return err!(EscrowError::UnroutablePayout);
        };
        *slot = slot
            .checked_add(payout.amount)
            .ok_or(EscrowError::Overflow)?;
    }

    let assigned = routing
        .to_recipient
        .checked_add(routing.to_sender)
        .ok_or(EscrowError::Overflow)?;
    require!(assigned <= locked, EscrowError::InsufficientFunds);

    routing.to_sender += locked - assigned;
    Ok(routing)
}

/// Validates first; the vault balance is only read once the transition is accepted.
pub fn plan_settlement(
    record: &EscrowRecord,
    action: Action,
    tx: &TransactionContext<'_>,
    locked: impl FnOnce() -> Result<u64>,
) -> Result<(Transition, Routing)> {
    let transition = match validate(record, action, tx) {
        Ok(transition) => transition,
        Err(reason) => {
            msg!("{:?} rejected: {}", action, reason);
            return Err(reason.into());
        }
    };
    let routing = route_payouts(record, tx.outputs, locked()?)?;
    Ok((transition, routing))
}

/// Every distinct key among `accounts` that carries a verified signature.
pub fn signers_of(accounts: &[AccountInfo]) -> Vec<Pubkey> {
    let mut signers: Vec<Pubkey> = Vec::with_capacity(accounts.len());
    for info in accounts.iter().filter(|info| info.is_signer) {
        if !signers.contains(info.key) {
            signers.push(*info.key);
        }
    }
    signers
}

pub fn execute_handler<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
    settle(ctx, Action::Execute, payouts).map(|_| ())
}

pub fn cancel_handler<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
    settle(ctx, Action::Cancel, payouts).map(|_| ())
}

pub fn confirm_handler<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, payouts: Vec<Output>) -> Result<()> {
    settle(ctx, Action::Confirm, payouts).map(|_| ())
}

fn settle<'info>(ctx: Context<'_, '_, '_, 'info, SettlePayment<'info>>, action: Action, payouts: Vec<Output>) -> Result<Transition> {
    let clock = Clock::get()?;
    let record = ctx.accounts.escrow.record;

    let instruction_accounts: Vec<AccountInfo> = [
        ctx.accounts.sender.to_account_info(),
        ctx.accounts.recipient.to_account_info(),
    ]
    .into_iter()
    .chain(ctx.remaining_accounts.iter().cloned())
    .collect();
    let signers = signers_of(&instruction_accounts);

    let tx = TransactionContext {
        outputs: &payouts,
        signers: &signers,
    };
    let (transition, routing) = plan_settlement(&record, action, &tx, || {
        vault_balance(&ctx.accounts.escrow_vault)
    })?;

    let escrow_key = ctx.accounts.escrow.key();
    let authority_bump = [ctx.bumps.escrow_vault_authority];
    let seeds: &[&[u8]] = &[
        PaymentEscrow::VAULT_AUTHORITY_SEED,
        escrow_key.as_ref(),
        &authority_bump,
    ];
    let signer_seeds = &[seeds];

    let accounts = &*ctx.accounts;
    if routing.to_recipient > 0 {
        let recipient_token_account = accounts
            .recipient_token_account
            .as_ref()
            .ok_or(EscrowError::RecipientAccountRequired)?;
        transfer_from_vault(
            accounts,
            recipient_token_account.to_account_info(),
            routing.to_recipient,
            signer_seeds,
        )?;
    }
    transfer_from_vault(
        accounts,
        accounts.sender_token_account.to_account_info(),
        routing.to_sender,
        signer_seeds,
    )?;

    // Close the vault token account, return rent to sender
    let close_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        CloseAccount {
            account: accounts.escrow_vault.to_account_info(),
            destination: accounts.sender.to_account_info(),
            authority: accounts.escrow_vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::close_account(close_ctx)?;

    // The consumed record is replaced by its successor at the same address
    ctx.accounts.escrow.apply(&transition, clock.unix_timestamp);

    msg!(
        "{:?} accepted: status={:?}, paid={}, refunded={}",
        action,
        transition.status(),
        routing.to_recipient,
        routing.to_sender
    );

    emit!(PaymentSettled {
        escrow: escrow_key,
        action,
        status: transition.status(),
        payment_id: record.payment_id,
        paid_to_recipient: routing.to_recipient,
        refunded_to_sender: routing.to_sender,
        settled_at: clock.unix_timestamp,
    });

    Ok(transition)
}

fn vault_balance(vault: &AccountInfo) -> Result<u64> {
    require_keys_eq!(*vault.owner, Token::id(), EscrowError::RecordMismatch);
    let data = vault.try_borrow_data()?;
    let account = TokenAccount::try_deserialize(&mut &data[..])?;
    Ok(account.amount)
}

fn transfer_from_vault<'info>(
    accounts: &SettlePayment<'info>,
    destination: AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let transfer_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        Transfer {
            from: accounts.escrow_vault.to_account_info(),
            to: destination,
            authority: accounts.escrow_vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::state::enums::PaymentStatus;

    fn record() -> EscrowRecord {
        EscrowRecord::pending(Pubkey::new_unique(), Pubkey::new_unique(), 1_000, [0; 32])
    }

    fn pay(destination: Pubkey, amount: u64) -> Output {
        Output { destination, amount }
    }

    #[test]
    fn remainder_is_refunded_to_sender() {
        let r = record();
        let routing = route_payouts(&r, &[pay(r.recipient, 600), pay(r.recipient, 400)], 1_250).unwrap();
        assert_eq!(
            routing,
            Routing {
                to_recipient: 1_000,
                to_sender: 250
            }
        );
    }

    #[test]
    fn empty_payouts_refund_everything() {
        let r = record();
        assert_eq!(
            route_payouts(&r, &[], 1_000).unwrap(),
            Routing {
                to_recipient: 0,
                to_sender: 1_000
            }
        );
    }

    #[test]
    fn explicit_sender_output_is_kept() {
        let r = record();
        let routing = route_payouts(&r, &[pay(r.sender, 300), pay(r.recipient, 700)], 1_000).unwrap();
        assert_eq!(routing.to_sender, 300);
        assert_eq!(routing.to_recipient, 700);
    }

    #[test]
    fn third_party_outputs_cannot_be_paid() {
        let r = record();
        assert_eq!(
            route_payouts(&r, &[pay(Pubkey::new_unique(), 1)], 1_000).unwrap_err(),
            EscrowError::UnroutablePayout.into()
        );
    }

    #[test]
    fn payouts_cannot_exceed_vault() {
        let r = record();
        assert_eq!(
            route_payouts(&r, &[pay(r.recipient, 1_001)], 1_000).unwrap_err(),
            EscrowError::InsufficientFunds.into()
        );
        assert_eq!(
            route_payouts(&r, &[pay(r.recipient, u64::MAX), pay(r.recipient, 1)], u64::MAX)
                .unwrap_err(),
            EscrowError::Overflow.into()
        );
    }

    #[test]
    fn payout_count_is_bounded() {
        let r = record();
        let payouts = vec![pay(r.recipient, 1); MAX_PAYOUTS + 1];
        assert_eq!(
            route_payouts(&r, &payouts, 1_000).unwrap_err(),
            EscrowError::TooManyPayouts.into()
        );
        assert!(route_payouts(&r, &payouts[..MAX_PAYOUTS], 1_000).is_ok());
    }

    #[test]
    fn signers_are_the_signing_accounts() {
        let owner = Pubkey::new_unique();
        let (sender, recipient, cosigner) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let (mut l1, mut l2, mut l3, mut l4) = (0u64, 0u64, 0u64, 0u64);
        let (mut d1, mut d2, mut d3, mut d4) = ([0u8; 0], [0u8; 0], [0u8; 0], [0u8; 0]);
        let accounts = [
            AccountInfo::new(&sender, true, true, &mut l1, &mut d1, &owner, false, 0),
            AccountInfo::new(&recipient, false, false, &mut l2, &mut d2, &owner, false, 0),
            AccountInfo::new(&cosigner, true, false, &mut l3, &mut d3, &owner, false, 0),
            AccountInfo::new(&sender, true, false, &mut l4, &mut d4, &owner, false, 0),
        ];
        assert_eq!(signers_of(&accounts), vec![sender, cosigner]);
        assert!(signers_of(&accounts[1..2]).is_empty());
        assert!(signers_of(&[]).is_empty());
    }

    #[test]
    fn settled_record_is_rejected_without_reading_the_vault() {
        let r = record();
        let outputs = [pay(r.recipient, 1_000)];
        let signers = [r.sender];
        let tx = TransactionContext {
            outputs: &outputs,
            signers: &signers,
        };

        let (transition, routing) =
            plan_settlement(&r, Action::Execute, &tx, || Ok(1_000)).unwrap();
        assert_eq!(transition.status(), PaymentStatus::Confirmed);
        assert_eq!(
            routing,
            Routing {
                to_recipient: 1_000,
                to_sender: 0
            }
        );

        // Vault is closed after the first settlement; reading it would fail.
        let vault_read = Cell::new(false);
        for action in Action::ALL {
            let err = plan_settlement(&transition.successor, action, &tx, || {
                vault_read.set(true);
                err!(EscrowError::RecordMismatch)
            })
            .unwrap_err();
            assert_eq!(err, EscrowError::AlreadyProcessed.into());
        }
        assert!(!vault_read.get());
    }

    #[test]
    fn rejection_reason_wins_over_routing_errors() {
        let r = record();
        let outputs = [pay(Pubkey::new_unique(), 1_000)];
        let signers = [r.recipient];
        let tx = TransactionContext {
            outputs: &outputs,
            signers: &signers,
        };
        assert_eq!(
            plan_settlement(&r, Action::Cancel, &tx, || Ok(1_000)).unwrap_err(),
            EscrowError::UnauthorizedSender.into()
        );
        assert_eq!(
            plan_settlement(&r, Action::Confirm, &tx, || Ok(1_000)).unwrap_err(),
            EscrowError::UnroutablePayout.into()
        );
    }

    #[test]
    fn cancel_routes_nothing_to_the_recipient() {
        let r = record();
        let signers = [r.sender];
        let tx = TransactionContext {
            outputs: &[],
            signers: &signers,
        };
        let (_, routing) = plan_settlement(&r, Action::Cancel, &tx, || Ok(1_000)).unwrap();
        assert_eq!(routing.to_recipient, 0);
        assert_eq!(routing.to_sender, 1_000);
    }

    #[test]
    fn too_many_payouts_are_rejected_after_validation() {
        let r = record();
        let outputs = vec![pay(r.recipient, 125); MAX_PAYOUTS + 1];
        let signers = [r.sender];
        let tx = TransactionContext {
            outputs: &outputs,
            signers: &signers,
        };
        assert_eq!(
            plan_settlement(&r, Action::Execute, &tx, || Ok(2_000)).unwrap_err(),
            EscrowError::TooManyPayouts.into()
        );
        let cancelled = r.successor(PaymentStatus::Cancelled);
        assert_eq!(
            plan_settlement(&cancelled, Action::Execute, &tx, || Ok(2_000)).unwrap_err(),
            EscrowError::AlreadyProcessed.into()
        );
    }
}
