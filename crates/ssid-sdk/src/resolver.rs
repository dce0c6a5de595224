//! # DID Key-History Resolution
//!
//! A DID is bound to one account at a time. Rotating the key pushes the old
//! `(account, added_block)` pair onto the DID's history. To find the account
//! that controlled a DID at some past height, walk that history newest
//! first.
//!
//! [`resolve_at`] is the pure decision procedure. It is kept separate from
//! the ledger queries so the rules can be property-tested.

use ssid_core::AccountId;

/// The account bound at `block`.
///
/// - `block == None`: the current account.
/// - `block >= current_added_block`: the current account.
/// - otherwise: the newest history entry whose `added_block <= block`, or
///   `None` if the DID did not exist yet.
///
/// `Some(0)` is a real height, not "unspecified".
pub fn resolve_at(
    current: AccountId,
    current_added_block: u64,
    history: &[(AccountId, u64)],
    block: Option<u64>,
) -> Option<AccountId> {
    let Some(block) = block else {
        return Some(current);
    };
    if block >= current_added_block {
        return Some(current);
    }
    history
        .iter()
        .rev()
        .find(|(_, added)| block >= *added)
        .map(|(account, _)| *account)
}
