//! Read-only status lookup for off-chain collaborators.
//!
//! Pollers (CLIs, dashboards, hardware bridges) fetch the raw account at a
//! record address from whatever RPC they use and decode it here.

use std::collections::HashMap;
use std::hash::BuildHasher;

use anchor_lang::prelude::*;

use crate::address::record_address;
use crate::errors::EscrowError;
use crate::state::enums::PaymentStatus;
use crate::state::escrow::PaymentEscrow;
use crate::state::record::PAYMENT_ID_LEN;

/// Anything that can return raw account data by address.
pub trait AccountSource {
    fn account_data(&self, address: &Pubkey) -> Option<Vec<u8>>;
}

impl<S: BuildHasher> AccountSource for HashMap<Pubkey, Vec<u8>, S> {
    fn account_data(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.get(address).cloned()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RecordView {
    pub address: Pubkey,
    pub status: PaymentStatus,
    pub amount: u64,
    pub payment_id: [u8; PAYMENT_ID_LEN],
}

pub fn lookup<A: AccountSource + ?Sized>(source: &A, address: &Pubkey) -> Result<RecordView> {
    let data = source
        .account_data(address)
        .ok_or(EscrowError::RecordNotFound)?;
    let escrow = PaymentEscrow::try_deserialize(&mut data.as_slice())?;
    Ok(RecordView {
        address: *address,
        status: escrow.record.status,
        amount: escrow.record.amount,
        payment_id: escrow.record.payment_id,
    })
}

pub fn lookup_payment<A: AccountSource + ?Sized>(
    source: &A,
    sender: &Pubkey,
    payment_id: &[u8; PAYMENT_ID_LEN],
) -> Result<RecordView> {
    let (address, _) = record_address(sender, payment_id);
    lookup(source, &address)
}
