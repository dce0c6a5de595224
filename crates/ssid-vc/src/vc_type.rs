//! Credential type tags.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use ssid_core::ValidationError;

/// The closed set of ledger credential types.
///
/// SCALE discriminants follow the ledger's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum VcType {
    /// Authorizes issuing a new token.
    #[codec(index = 0)]
    #[serde(rename = "TokenVC")]
    TokenVc,
    /// Authorizes slashing tokens from the owner.
    #[codec(index = 1)]
    SlashTokens,
    /// Authorizes minting tokens to the owner.
    #[codec(index = 2)]
    MintTokens,
    /// Authorizes a token transfer by the owner.
    #[codec(index = 3)]
    #[serde(rename = "TokenTransferVC")]
    TokenTransferVc,
    /// Anchors off-chain content by content identifier.
    #[codec(index = 4)]
    #[serde(rename = "GenericVC")]
    GenericVc,
}

impl VcType {
    /// All types, in discriminant order.
    pub const ALL: [VcType; 5] = [
        VcType::TokenVc,
        VcType::SlashTokens,
        VcType::MintTokens,
        VcType::TokenTransferVc,
        VcType::GenericVc,
    ];

    /// The name the ledger and content service use.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenVc => "TokenVC",
            Self::SlashTokens => "SlashTokens",
            Self::MintTokens => "MintTokens",
            Self::TokenTransferVc => "TokenTransferVC",
            Self::GenericVc => "GenericVC",
        }
    }

    /// Whether the hash of record is computed locally.
    pub fn has_local_hash(&self) -> bool {
        !matches!(self, Self::GenericVc)
    }
}

impl std::fmt::Display for VcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VcType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVcType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_are_stable() {
        let bytes: Vec<u8> = VcType::ALL.iter().flat_map(|t| t.encode()).collect();
        assert_eq!(bytes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn names_round_trip() {
        for t in VcType::ALL {
            assert_eq!(t.as_str().parse::<VcType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn unknown_type_is_validation_error() {
        assert_eq!(
            "BurnVC".parse::<VcType>(),
            Err(ValidationError::UnknownVcType("BurnVC".into()))
        );
        assert!(VcType::decode(&mut &[9u8][..]).is_err());
    }
}
