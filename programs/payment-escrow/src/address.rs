use anchor_lang::prelude::*;
use solana_hash::Hash;
use solana_sha256_hasher::hashv;

use crate::state::enums::Action;
use crate::state::escrow::PaymentEscrow;
use crate::state::record::PAYMENT_ID_LEN;

// ──────────────────────────────────────────────────────
// Locking identity
//
// On-chain, the locking identity is the program id: every record
// and vault is a PDA of `crate::ID`, so funds can only leave through
// `validate`. `script_hash` / `locking_address` are the off-chain
// fingerprint of that validator, derived from the program id, the
// validator version and its action set, never from build artifacts.
// ──────────────────────────────────────────────────────

pub const SCRIPT_DOMAIN: &[u8] = b"payment-escrow/validator";

/// Must be bumped by hand whenever `validate` accepts or rejects a
/// different set of transactions; the fingerprint does not track code.
pub const VALIDATOR_VERSION: u8 = 1;

pub fn script_hash() -> Hash {
    let action_tags = Action::ALL.map(Action::tag);
    hashv(&[
        SCRIPT_DOMAIN,
        &[VALIDATOR_VERSION],
        &action_tags,
        crate::ID.as_ref(),
    ])
}

pub fn locking_address() -> Pubkey {
    Pubkey::new_from_array(script_hash().to_bytes())
}

/// Address of the record locked by `sender` under `payment_id`.
pub fn record_address(sender: &Pubkey, payment_id: &[u8; PAYMENT_ID_LEN]) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PaymentEscrow::SEED, sender.as_ref(), payment_id.as_ref()],
        &crate::ID,
    )
}

pub fn vault_address(escrow: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PaymentEscrow::VAULT_SEED, escrow.as_ref()], &crate::ID)
}

pub fn vault_authority_address(escrow: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PaymentEscrow::VAULT_AUTHORITY_SEED, escrow.as_ref()],
        &crate::ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::payment_id_from_str;

    #[test]
    fn script_hash_is_stable() {
        assert_eq!(script_hash(), script_hash());
        assert_eq!(locking_address(), locking_address());
        assert_eq!(locking_address().to_bytes(), script_hash().to_bytes());
    }

    #[test]
    fn script_hash_commits_to_version() {
        let action_tags = Action::ALL.map(Action::tag);
        let next = hashv(&[
            SCRIPT_DOMAIN,
            &[VALIDATOR_VERSION + 1],
            &action_tags,
            crate::ID.as_ref(),
        ]);
        assert_ne!(script_hash(), next);
    }

    #[test]
    fn record_address_is_per_sender_and_payment() {
        let sender = Pubkey::new_unique();
        let job = payment_id_from_str("job-42").unwrap();
        let other_job = payment_id_from_str("job-43").unwrap();

        let (address, bump) = record_address(&sender, &job);
        assert_eq!(record_address(&sender, &job), (address, bump));
        assert_ne!(record_address(&sender, &other_job).0, address);
        assert_ne!(record_address(&Pubkey::new_unique(), &job).0, address);
    }

    #[test]
    fn records_are_locked_under_the_program_id() {
        let sender = Pubkey::new_unique();
        let job = payment_id_from_str("job-42").unwrap();
        let (address, bump) = record_address(&sender, &job);
        let derived = Pubkey::create_program_address(
            &[PaymentEscrow::SEED, sender.as_ref(), job.as_ref(), &[bump]],
            &crate::ID,
        )
        .unwrap();
        assert_eq!(derived, address);
        assert_ne!(locking_address(), crate::ID);
    }

    #[test]
    fn vault_addresses_hang_off_the_record() {
        let (escrow, _) = record_address(&Pubkey::new_unique(), &[7; PAYMENT_ID_LEN]);
        assert_ne!(vault_address(&escrow).0, vault_authority_address(&escrow).0);
    }
}
