//! Hex helpers shared by the fixed-width newtypes.

use crate::error::ValidationError;

/// Render bytes as a lowercase `0x`-prefixed hex string.
pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Strip an optional `0x` prefix.
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Decode a hex string (with or without `0x`) into exactly `N` bytes.
///
/// A body shorter than `2 * N` digits is right-padded with zero bytes, which
/// matches how canonical identifiers are padded. A longer body is rejected.
pub fn decode_fixed<const N: usize>(
    field: &'static str,
    s: &str,
) -> Result<[u8; N], ValidationError> {
    let body = strip_prefix(s);
    let bytes = hex::decode(body).map_err(|_| ValidationError::InvalidHex {
        field,
        input: s.to_string(),
    })?;
    pad_fixed(field, &bytes)
}

/// Decode a hex string (with or without `0x`) that must be exactly `N` bytes.
///
/// Digests and account keys have no padding rule; a short body is as wrong
/// as a long one.
pub fn decode_exact<const N: usize>(
    field: &'static str,
    s: &str,
) -> Result<[u8; N], ValidationError> {
    let bytes = hex::decode(strip_prefix(s)).map_err(|_| ValidationError::InvalidHex {
        field,
        input: s.to_string(),
    })?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| ValidationError::WrongLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

/// Copy `bytes` into a zero-padded `N`-byte array.
pub fn pad_fixed<const N: usize>(
    field: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], ValidationError> {
    if bytes.len() > N {
        return Err(ValidationError::FieldTooLong {
            field,
            max: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Recover text from a NUL-padded fixed field.
pub fn text_from_fixed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches('\0')
        .to_string()
}

/// Hex `Display`, `FromStr` and serde impls for a `[u8; N]` newtype.
macro_rules! impl_fixed_hex {
    ($ty:ident, $n:expr, $field:literal) => {
        impl $ty {
            /// Lowercase `0x`-prefixed hex.
            pub fn to_hex(&self) -> String {
                $crate::hexutil::to_prefixed_hex(&self.0)
            }

            /// Parse from hex with or without `0x`; the length must be exact.
            pub fn from_hex(s: &str) -> Result<Self, $crate::error::ValidationError> {
                $crate::hexutil::decode_exact::<$n>($field, s).map(Self)
            }

            /// Access the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $n] {
                &self.0
            }
        }

        impl From<[u8; $n]> for $ty {
            fn from(bytes: [u8; $n]) -> Self {
                Self(bytes)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.to_hex())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_fixed_hex;
