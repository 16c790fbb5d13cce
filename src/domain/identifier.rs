// ============================================================================
// Fixed-Width Identifiers
// Opaque 128/160/256-bit values with hex and account-text forms
// ============================================================================

use crate::interfaces::{AddressCodec, Base58AddressCodec, ACCOUNT_ID_LEN};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Exactly `N` bytes, or the invalid sentinel.
///
/// Parsing never fails loudly: malformed input produces an invalid
/// identifier that compares unequal to everything, itself included.
#[derive(Clone, Copy)]
pub struct FixedWidthId<const N: usize> {
    bytes: Option<[u8; N]>,
}

/// 128-bit identifier
pub type UInt128 = FixedWidthId<16>;

/// 160-bit identifier (accounts, currency codes)
pub type UInt160 = FixedWidthId<20>;

/// 256-bit identifier (hashes, book directories)
pub type UInt256 = FixedWidthId<32>;

/// Account identifier
pub type AccountId = UInt160;

impl<const N: usize> FixedWidthId<N> {
    /// Width in bytes
    pub const WIDTH: usize = N;

    #[inline]
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes: Some(bytes) }
    }

    #[inline]
    pub const fn invalid() -> Self {
        Self { bytes: None }
    }

    /// All-zero identifier
    #[inline]
    pub const fn zero() -> Self {
        Self::from_bytes([0u8; N])
    }

    /// All zero except the last byte, which is 1
    pub const fn one() -> Self {
        let mut bytes = [0u8; N];
        bytes[N - 1] = 1;
        Self::from_bytes(bytes)
    }

    /// Copy from a slice; any length other than `N` yields invalid.
    pub fn from_slice(bytes: &[u8]) -> Self {
        match <[u8; N]>::try_from(bytes) {
            Ok(bytes) => Self::from_bytes(bytes),
            Err(_) => Self::invalid(),
        }
    }

    /// Parse exactly `2 × N` hex digits (either case).
    pub fn parse_hex(text: &str) -> Self {
        let mut bytes = [0u8; N];
        match hex::decode_to_slice(text, &mut bytes) {
            Ok(()) => Self::from_bytes(bytes),
            Err(_) => Self::invalid(),
        }
    }

    /// Parse the JSON text forms: hex, or the `"0"` / `"1"` sentinels.
    pub fn parse(text: &str) -> Self {
        match text {
            "0" => Self::zero(),
            "1" => Self::one(),
            _ => Self::parse_hex(text),
        }
    }

    /// Parse the JSON text forms. 20-byte identifiers also accept the
    /// account text of the default codec.
    pub fn parse_json(text: &str) -> Self {
        let id = Self::parse(text);
        if id.is_valid() || N != ACCOUNT_ID_LEN {
            return id;
        }
        match UInt160::parse_account(text).to_bytes() {
            Some(bytes) => Self::from_slice(&bytes),
            None => Self::invalid(),
        }
    }

    /// JSON text: account text for 20-byte identifiers, hex otherwise.
    /// `None` if invalid.
    pub fn to_json(&self) -> Option<String> {
        let bytes = self.bytes.as_ref()?;
        match <&[u8; ACCOUNT_ID_LEN]>::try_from(&bytes[..]) {
            Ok(account) => Some(Base58AddressCodec::default().encode(account)),
            Err(_) => self.to_hex(),
        }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.bytes, Some(bytes) if bytes.iter().all(|&b| b == 0))
    }

    #[inline]
    pub const fn as_bytes(&self) -> Option<&[u8; N]> {
        self.bytes.as_ref()
    }

    #[inline]
    pub const fn to_bytes(&self) -> Option<[u8; N]> {
        self.bytes
    }

    /// Uppercase hex, `None` if invalid.
    pub fn to_hex(&self) -> Option<String> {
        self.bytes.map(hex::encode_upper)
    }

    /// Byte-wise equality; invalid identifiers are never equal.
    #[inline]
    pub fn equals(&self, other: &Self) -> bool {
        matches!((self.bytes, other.bytes), (Some(a), Some(b)) if a == b)
    }
}

impl FixedWidthId<ACCOUNT_ID_LEN> {
    /// Parse an account in any accepted text form: the `"0"` / `"1"`
    /// sentinels, 40 hex digits, or the network's account text.
    pub fn parse_account(text: &str) -> Self {
        Self::parse_account_with(text, &Base58AddressCodec::default())
    }

    pub fn parse_account_with(text: &str, codec: &dyn AddressCodec) -> Self {
        let text = text.trim();
        let id = Self::parse(text);
        if id.is_valid() {
            return id;
        }

        match codec.decode(text) {
            Some(bytes) => Self::from_bytes(bytes),
            None => {
                tracing::trace!("Rejected account text: {:?}", text);
                Self::invalid()
            },
        }
    }

    /// Account text via the default codec, `None` if invalid.
    pub fn to_account_text(&self) -> Option<String> {
        self.to_account_text_with(&Base58AddressCodec::default())
    }

    pub fn to_account_text_with(&self, codec: &dyn AddressCodec) -> Option<String> {
        self.bytes.as_ref().map(|bytes| codec.encode(bytes))
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const N: usize> Default for FixedWidthId<N> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> PartialEq for FixedWidthId<N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<const N: usize> PartialOrd for FixedWidthId<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.bytes, &other.bytes) {
            (Some(a), Some(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl<const N: usize> Hash for FixedWidthId<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl<const N: usize> From<[u8; N]> for FixedWidthId<N> {
    #[inline]
    fn from(bytes: [u8; N]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<const N: usize> fmt::Debug for FixedWidthId<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_hex() {
            Some(hex) => write!(f, "UInt{}({})", N * 8, hex),
            None => write!(f, "UInt{}(invalid)", N * 8),
        }
    }
}

impl<const N: usize> fmt::Display for FixedWidthId<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_hex() {
            Some(hex) => f.write_str(&hex),
            None => f.write_str("NaN"),
        }
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for FixedWidthId<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> serde::Deserialize<'de> for FixedWidthId<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(text.map_or_else(Self::invalid, |t| Self::parse_json(&t)))
    }
}
