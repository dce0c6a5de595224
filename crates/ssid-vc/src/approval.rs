//! # Approval State
//!
//! The ledger owns the approval threshold and the one-shot consumption
//! rule. This module only interprets what the ledger returns:
//!
//! ```text
//! Created ──store──▶ StoredInactive ──approve──▶ PartiallyApproved ──approve──▶ Active
//!                                                                             │
//!                                     Revoked ◀──update_status(Inactive)──────┤
//!                                                                             ▼
//!                                                                         Consumed
//! ```
//!
//! A privileged status override can move between `Active` and `Revoked` at
//! any time, including after consumption.

use serde::{Deserialize, Serialize};

use crate::credential::{VcStatus, VerifiableCredential};

/// Lifecycle position of a credential as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ApprovalState {
    /// Drafted locally, not yet stored.
    Created,
    /// Stored with only the creator's signature.
    StoredInactive,
    /// Some but not all issuers have signed.
    PartiallyApproved {
        /// Signatures present.
        signatures: usize,
        /// Signatures needed to activate.
        required: usize,
    },
    /// Usable by consuming operations.
    Active,
    /// Inactive despite a full signature set: a privileged override.
    Revoked,
    /// Already used by a consuming operation.
    Consumed,
}

impl ApprovalState {
    /// Interpret a stored credential and its ledger status.
    pub fn observe(vc: &VerifiableCredential, status: VcStatus) -> Self {
        if vc.is_vc_used {
            return Self::Consumed;
        }
        let signatures = vc.signatures.len();
        let required = vc.issuers.len();
        match status {
            VcStatus::Active => Self::Active,
            VcStatus::Inactive if signatures >= required => Self::Revoked,
            VcStatus::Inactive if signatures <= 1 => Self::StoredInactive,
            VcStatus::Inactive => Self::PartiallyApproved {
                signatures,
                required,
            },
        }
    }

    /// Whether a consuming operation would be accepted.
    pub fn can_be_consumed(&self) -> bool {
        matches!(self, Self::Active)
    }
}
