use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::enums::PaymentStatus;

/// Fixed width of the opaque off-chain job identifier.
pub const PAYMENT_ID_LEN: usize = 32;

// ──────────────────────────────────────────────────────
// Escrow Record — the locked value commitment
//
// Field order is the canonical encoding order:
// sender, recipient, amount, payment_id, status.
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EscrowRecord {
    pub sender: Pubkey,                   // May cancel; must sign Execute
    pub recipient: Pubkey,                // May confirm; destination of the payout
    pub amount: u64,                      // Minimum payout in the asset's smallest unit
    pub payment_id: [u8; PAYMENT_ID_LEN], // Opaque job correlation, never interpreted
    pub status: PaymentStatus,
}

impl EscrowRecord {
    pub const LEN: usize = 32     // sender
        + 32                      // recipient
        + 8                       // amount
        + PAYMENT_ID_LEN          // payment_id
        + 1;                      // status

    /// A freshly locked record. Records always start out `Pending`.
    pub fn pending(
        sender: Pubkey,
        recipient: Pubkey,
        amount: u64,
        payment_id: [u8; PAYMENT_ID_LEN],
    ) -> Self {
        Self {
            sender,
            recipient,
            amount,
            payment_id,
            status: PaymentStatus::Pending,
        }
    }

    /// The record that replaces this one once a transition is accepted.
    pub fn successor(&self, status: PaymentStatus) -> Self {
        Self { status, ..*self }
    }

    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::LEN);
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    /// Strict decode: trailing bytes and unknown status tags are errors.
    pub fn decode(bytes: &[u8]) -> std::io::Result<Self> {
        Self::try_from_slice(bytes)
    }
}

/// Zero-pads an off-chain identifier (UUID, hash, free text) to the fixed width.
pub fn payment_id_from_bytes(raw: &[u8]) -> Result<[u8; PAYMENT_ID_LEN]> {
    require!(raw.len() <= PAYMENT_ID_LEN, EscrowError::PaymentIdTooLong);
    let mut id = [0u8; PAYMENT_ID_LEN];
    id[..raw.len()].copy_from_slice(raw);
    Ok(id)
}

pub fn payment_id_from_str(raw: &str) -> Result<[u8; PAYMENT_ID_LEN]> {
    payment_id_from_bytes(raw.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EscrowRecord {
        EscrowRecord::pending(
            Pubkey::new_from_array([1; 32]),
            Pubkey::new_from_array([2; 32]),
            1_000_000,
            payment_id_from_str("job-42").unwrap(),
        )
    }

    #[test]
    fn encoding_uses_fixed_field_order() {
        let bytes = sample().encode().unwrap();
        assert_eq!(bytes.len(), EscrowRecord::LEN);
        assert_eq!(&bytes[0..32], &[1u8; 32]);
        assert_eq!(&bytes[32..64], &[2u8; 32]);
        assert_eq!(&bytes[64..72], &1_000_000u64.to_le_bytes());
        assert_eq!(&bytes[72..78], b"job-42");
        assert!(bytes[78..104].iter().all(|b| *b == 0));
        assert_eq!(bytes[104], 0);
    }

    #[test]
    fn encoding_is_deterministic_and_recoverable() {
        let record = sample().successor(PaymentStatus::Cancelled);
        let first = record.encode().unwrap();
        assert_eq!(first, record.encode().unwrap());
        assert_eq!(first[104], 2);
        assert_eq!(EscrowRecord::decode(&first).unwrap(), record);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let mut bytes = sample().encode().unwrap();
        assert!(EscrowRecord::decode(&bytes[..EscrowRecord::LEN - 1]).is_err());

        bytes.push(0);
        assert!(EscrowRecord::decode(&bytes).is_err());

        bytes.pop();
        bytes[104] = 7;
        assert!(EscrowRecord::decode(&bytes).is_err());
    }

    #[test]
    fn successor_only_changes_status() {
        let record = sample();
        let next = record.successor(PaymentStatus::Confirmed);
        assert_eq!(next.status, PaymentStatus::Confirmed);
        assert_eq!(next.successor(PaymentStatus::Pending), record);
        assert_eq!(record.status, PaymentStatus::Pending);
    }

    #[test]
    fn payment_id_is_bounded() {
        let full = [0xAB; PAYMENT_ID_LEN];
        assert_eq!(payment_id_from_bytes(&full).unwrap(), full);
        assert_eq!(payment_id_from_str("").unwrap(), [0u8; PAYMENT_ID_LEN]);
        assert!(payment_id_from_bytes(&[0u8; PAYMENT_ID_LEN + 1]).is_err());
    }
}
