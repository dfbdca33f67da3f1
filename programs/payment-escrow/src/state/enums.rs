use anchor_lang::prelude::*;

// ──────────────────────────────────────────────────────
// Payment Status — tracks lifecycle state
//
// Borsh writes the variant index as a single tag byte, so the
// declaration order below is part of the wire format.
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaymentStatus {
    Pending,   // Funds locked, awaiting a transition
    Confirmed, // Paid out (Execute or Confirm)
    Cancelled, // Withdrawn by the sender
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

// ──────────────────────────────────────────────────────
// Action — the transition requested by the caller
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Execute, // Sender forces payout to the recipient
    Cancel,  // Sender withdraws the commitment
    Confirm, // Recipient acknowledges receipt
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Execute, Action::Cancel, Action::Confirm];

    /// Status the record holds after this action is accepted.
    pub fn target_status(self) -> PaymentStatus {
        match self {
            Action::Execute => PaymentStatus::Confirmed,
            Action::Cancel => PaymentStatus::Cancelled,
            Action::Confirm => PaymentStatus::Confirmed,
        }
    }

    /// Discriminant byte, identical to the first byte of `encode`.
    pub fn tag(self) -> u8 {
        match self {
            Action::Execute => 0,
            Action::Cancel => 1,
            Action::Confirm => 2,
        }
    }

    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(1);
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> std::io::Result<Self> {
        Self::try_from_slice(bytes)
    }
}
