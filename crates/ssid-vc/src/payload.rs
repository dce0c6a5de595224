//! # Signing Payload and Hash of Record
//!
//! The signing payload is the SCALE encoding of
//! `(vc_type, vc_property, owner, issuers)`:
//!
//! ```text
//! vc_type (1) ‖ vc_property (128) ‖ owner (32) ‖ compact(len) ‖ issuer (32) × len
//! ```
//!
//! The hash of record is Blake2b-256 of that payload. Signers sign the
//! 32 hash bytes, not the payload.

use parity_scale_codec::Encode;
use ssid_core::{Hash256, DID_BYTES, VC_PROPERTY_BYTES};

use crate::vc_type::VcType;

/// Build the byte-exact signing payload.
pub fn signing_payload(
    vc_type: VcType,
    vc_property: &[u8; VC_PROPERTY_BYTES],
    owner: &[u8; DID_BYTES],
    issuers: &[[u8; DID_BYTES]],
) -> Vec<u8> {
    (vc_type, vc_property, owner, issuers).encode()
}

/// Blake2b-256 of a signing payload.
pub fn hash_payload(payload: &[u8]) -> Hash256 {
    ssid_crypto::blake2_256(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn payload_layout() {
        let property = [7u8; VC_PROPERTY_BYTES];
        let owner = [1u8; DID_BYTES];
        let issuers = [[2u8; DID_BYTES], [3u8; DID_BYTES]];
        let payload = signing_payload(VcType::MintTokens, &property, &owner, &issuers);

        assert_eq!(payload.len(), 1 + 128 + 32 + 1 + 64);
        assert_eq!(payload[0], 2);
        assert_eq!(&payload[1..129], &property);
        assert_eq!(&payload[129..161], &owner);
        // compact(2) is 2 << 2
        assert_eq!(payload[161], 8);
        assert_eq!(&payload[162..194], &[2u8; 32]);
        assert_eq!(&payload[194..226], &[3u8; 32]);
    }

    #[test]
    fn issuer_order_matters() {
        let property = [0u8; VC_PROPERTY_BYTES];
        let owner = [1u8; DID_BYTES];
        let a = signing_payload(VcType::TokenVc, &property, &owner, &[[2; 32], [3; 32]]);
        let b = signing_payload(VcType::TokenVc, &property, &owner, &[[3; 32], [2; 32]]);
        assert_ne!(hash_payload(&a), hash_payload(&b));
    }

    proptest! {
        #[test]
        fn hash_is_deterministic_and_byte_sensitive(
            property in proptest::collection::vec(any::<u8>(), VC_PROPERTY_BYTES),
            owner in any::<[u8; 32]>(),
            issuer in any::<[u8; 32]>(),
            flip in 0usize..(1 + 128 + 32 + 1 + 32),
        ) {
            let property: [u8; VC_PROPERTY_BYTES] = property.try_into().unwrap();
            let payload = signing_payload(VcType::TokenTransferVc, &property, &owner, &[issuer]);
            prop_assert_eq!(hash_payload(&payload), hash_payload(&payload.clone()));

            let mut tampered = payload.clone();
            tampered[flip] ^= 0x01;
            prop_assert_ne!(hash_payload(&payload), hash_payload(&tampered));
        }
    }
}
