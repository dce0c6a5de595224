//! # Fixed-Layout Property Codec
//!
//! Every ledger credential carries a 128-byte `vc_property` blob whose
//! internal layout depends on its [`VcType`]. Each layout is a SCALE struct
//! of fixed-width fields, so encoding is a plain concatenation:
//!
//! | Type | Fields (bytes) |
//! |------|----------------|
//! | `TokenVC` | token_name 16, reservable_balance 16 (u128 LE), decimal 1, currency_code 8 |
//! | `SlashTokens`, `MintTokens`, `TokenTransferVC` | vc_id 32, currency_code 8, amount 16 (u128 LE) |
//! | `GenericVC` | cid 64 |
//!
//! The encoded fields are zero-padded to 128 bytes. Decoding reads the
//! fields and ignores the padding; text fields lose their trailing NULs.
//!
//! Amounts are in lowest form.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use ssid_core::{
    Cid, CurrencyCode, TokenName, VcId, CID_BYTES, CURRENCY_CODE_BYTES, TOKEN_NAME_BYTES,
    VC_PROPERTY_BYTES,
};

use crate::error::VcError;
use crate::vc_type::VcType;

/// How a field's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text, NUL-padded.
    Text,
    /// Raw 32-byte hash.
    Hash,
    /// Little-endian `u128`.
    U128,
    /// Single byte.
    U8,
}

/// One field of a property layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Byte offset within the 128-byte blob.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
    /// Interpretation.
    pub kind: FieldKind,
}

const fn field(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        kind,
    }
}

const TOKEN_LAYOUT: &[FieldSpec] = &[
    field("token_name", 0, TOKEN_NAME_BYTES, FieldKind::Text),
    field("reservable_balance", 16, 16, FieldKind::U128),
    field("decimal", 32, 1, FieldKind::U8),
    field("currency_code", 33, CURRENCY_CODE_BYTES, FieldKind::Text),
];

const AMOUNT_LAYOUT: &[FieldSpec] = &[
    field("vc_id", 0, 32, FieldKind::Hash),
    field("currency_code", 32, CURRENCY_CODE_BYTES, FieldKind::Text),
    field("amount", 40, 16, FieldKind::U128),
];

const GENERIC_LAYOUT: &[FieldSpec] = &[field("cid", 0, CID_BYTES, FieldKind::Text)];

impl VcType {
    /// The property layout for this type.
    pub fn layout(&self) -> &'static [FieldSpec] {
        match self {
            Self::TokenVc => TOKEN_LAYOUT,
            Self::SlashTokens | Self::MintTokens | Self::TokenTransferVc => AMOUNT_LAYOUT,
            Self::GenericVc => GENERIC_LAYOUT,
        }
    }
}

// -- Wire structs ------------------------------------------------------------

#[derive(Encode, Decode)]
struct TokenWire {
    token_name: [u8; TOKEN_NAME_BYTES],
    reservable_balance: u128,
    decimal: u8,
    currency_code: [u8; CURRENCY_CODE_BYTES],
}

#[derive(Encode, Decode)]
struct AmountWire {
    vc_id: [u8; 32],
    currency_code: [u8; CURRENCY_CODE_BYTES],
    amount: u128,
}

#[derive(Encode, Decode)]
struct GenericWire {
    cid: [u8; CID_BYTES],
}

// -- Typed properties --------------------------------------------------------

/// Property of a `TokenVC`: the token to be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVcProperty {
    /// Display name of the token.
    pub token_name: TokenName,
    /// Initial reservable balance, lowest form.
    #[serde(with = "amount_str")]
    pub reservable_balance: u128,
    /// Decimal precision of the token.
    pub decimal: u8,
    /// Symbol of the token.
    pub currency_code: CurrencyCode,
}

/// Property shared by `SlashTokens`, `MintTokens` and `TokenTransferVC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountVcProperty {
    /// The `TokenVC` this operation is scoped to.
    pub vc_id: VcId,
    /// Symbol of the token.
    pub currency_code: CurrencyCode,
    /// Amount, lowest form.
    #[serde(with = "amount_str")]
    pub amount: u128,
}

/// Property of a `GenericVC`: a pointer to off-chain content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericVcProperty {
    /// Content identifier.
    pub cid: Cid,
}

/// A decoded credential property, one variant per [`VcType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "vc_type")]
pub enum VcProperty {
    /// `TokenVC`.
    #[serde(rename = "TokenVC")]
    Token(TokenVcProperty),
    /// `SlashTokens`.
    #[serde(rename = "SlashTokens")]
    Slash(AmountVcProperty),
    /// `MintTokens`.
    #[serde(rename = "MintTokens")]
    Mint(AmountVcProperty),
    /// `TokenTransferVC`.
    #[serde(rename = "TokenTransferVC")]
    Transfer(AmountVcProperty),
    /// `GenericVC`.
    #[serde(rename = "GenericVC")]
    Generic(GenericVcProperty),
}

impl VcProperty {
    /// The type tag this property belongs to.
    pub fn vc_type(&self) -> VcType {
        match self {
            Self::Token(_) => VcType::TokenVc,
            Self::Slash(_) => VcType::SlashTokens,
            Self::Mint(_) => VcType::MintTokens,
            Self::Transfer(_) => VcType::TokenTransferVc,
            Self::Generic(_) => VcType::GenericVc,
        }
    }

    /// Encode to the fixed 128-byte blob.
    pub fn encode(&self) -> [u8; VC_PROPERTY_BYTES] {
        let bytes = match self {
            Self::Token(p) => TokenWire {
                token_name: p.token_name.to_bytes(),
                reservable_balance: p.reservable_balance,
                decimal: p.decimal,
                currency_code: p.currency_code.to_bytes(),
            }
            .encode(),
            Self::Slash(p) | Self::Mint(p) | Self::Transfer(p) => AmountWire {
                vc_id: p.vc_id.0,
                currency_code: p.currency_code.to_bytes(),
                amount: p.amount,
            }
            .encode(),
            Self::Generic(p) => GenericWire {
                cid: p.cid.to_bytes(),
            }
            .encode(),
        };
        let mut out = [0u8; VC_PROPERTY_BYTES];
        out[..bytes.len()].copy_from_slice(&bytes);
        out
    }

    /// Decode a blob according to `vc_type`'s layout.
    pub fn decode(vc_type: VcType, blob: &[u8; VC_PROPERTY_BYTES]) -> Result<Self, VcError> {
        let mut input = &blob[..];
        let property = match vc_type {
            VcType::TokenVc => {
                let w = TokenWire::decode(&mut input).map_err(|e| VcError::decode("TokenVC", e))?;
                Self::Token(TokenVcProperty {
                    token_name: TokenName::from_bytes(&w.token_name),
                    reservable_balance: w.reservable_balance,
                    decimal: w.decimal,
                    currency_code: CurrencyCode::from_bytes(&w.currency_code)?,
                })
            }
            VcType::SlashTokens | VcType::MintTokens | VcType::TokenTransferVc => {
                let w = AmountWire::decode(&mut input)
                    .map_err(|e| VcError::decode("amount property", e))?;
                let p = AmountVcProperty {
                    vc_id: VcId::from(w.vc_id),
                    currency_code: CurrencyCode::from_bytes(&w.currency_code)?,
                    amount: w.amount,
                };
                match vc_type {
                    VcType::SlashTokens => Self::Slash(p),
                    VcType::MintTokens => Self::Mint(p),
                    _ => Self::Transfer(p),
                }
            }
            VcType::GenericVc => {
                let w =
                    GenericWire::decode(&mut input).map_err(|e| VcError::decode("GenericVC", e))?;
                Self::Generic(GenericVcProperty {
                    cid: Cid::from_bytes(&w.cid),
                })
            }
        };
        Ok(property)
    }

    /// The content identifier, for generic credentials.
    pub fn cid(&self) -> Option<&Cid> {
        match self {
            Self::Generic(p) => Some(&p.cid),
            _ => None,
        }
    }
}

/// `u128` amounts as decimal strings in JSON.
mod amount_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
