//! # Hash of Record
//!
//! `Hash256` is the 32-byte digest a verifiable credential is anchored to.
//! On the ledger it doubles as the credential identifier, so [`VcId`] is an
//! alias rather than a distinct type.

use parity_scale_codec::{Decode, Encode};
use subtle::ConstantTimeEq;

use crate::hexutil::impl_fixed_hex;

/// A 32-byte digest, rendered as lowercase `0x` hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Encode, Decode)]
pub struct Hash256(pub [u8; 32]);

impl_fixed_hex!(Hash256, 32, "hash");

/// Ledger identifier of a verifiable credential (its hash of record).
pub type VcId = Hash256;

impl Hash256 {
    /// Compare two digests in constant time.
    ///
    /// Used wherever a digest received from an untrusted party is checked
    /// against one held locally.
    pub fn ct_eq(&self, other: &Hash256) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let h = Hash256([0xab; 32]);
        let parsed: Hash256 = h.to_hex().parse().unwrap();
        assert_eq!(parsed, h);
        assert!(h.to_hex().starts_with("0xabab"));
        assert_eq!(h.to_hex().len(), 66);
    }

    #[test]
    fn short_hex_is_not_a_hash() {
        assert!(matches!(
            Hash256::from_hex("0xab"),
            Err(crate::ValidationError::WrongLength { expected: 32, actual: 1, .. })
        ));
        assert!(serde_json::from_str::<Hash256>("\"0xabcd\"").is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let h = Hash256([1; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(32)));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn constant_time_eq_matches_eq() {
        let a = Hash256([7; 32]);
        let mut b = a;
        assert!(a.ct_eq(&b));
        b.0[31] ^= 1;
        assert!(!a.ct_eq(&b));
    }

    #[test]
    fn scale_encoding_is_raw_bytes() {
        let h = Hash256([9; 32]);
        assert_eq!(h.encode(), vec![9u8; 32]);
    }
}
