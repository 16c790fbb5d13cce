// ============================================================================
// Address Codec Interface
// Defines the contract for rendering 20-byte account identifiers as text
// ============================================================================

use sha2::{Digest, Sha256};
use smallvec::SmallVec;

/// Length of an account identifier in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// Text codec for account identifiers.
/// Implementations decide the network's account-text encoding; the identifier
/// and amount types only call through this trait.
pub trait AddressCodec: Send + Sync {
    /// Render an account identifier as text
    fn encode(&self, account: &[u8; ACCOUNT_ID_LEN]) -> String;

    /// Parse account text, `None` if it is not a valid address
    fn decode(&self, text: &str) -> Option<[u8; ACCOUNT_ID_LEN]>;
}

/// Alphabet of the ledger's base58 account encoding
pub const LEDGER_ALPHABET: &[u8; 58] =
    b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Version byte prefixed to account identifiers
pub const ACCOUNT_ID_VERSION: u8 = 0;

const CHECKSUM_LEN: usize = 4;

/// Base58check codec: `version || payload || sha256d(version || payload)[..4]`.
#[derive(Debug, Clone, Copy)]
pub struct Base58AddressCodec {
    alphabet: &'static [u8; 58],
    version: u8,
}

impl Base58AddressCodec {
    pub const fn new(alphabet: &'static [u8; 58], version: u8) -> Self {
        Self { alphabet, version }
    }

    fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
        let digest = Sha256::digest(Sha256::digest(payload));
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[..CHECKSUM_LEN]);
        out
    }

    fn encode_base58(&self, input: &[u8]) -> String {
        // Little-endian base58 digits
        let mut digits: SmallVec<[u8; 64]> = SmallVec::new();
        for &byte in input {
            let mut carry = byte as u32;
            for digit in digits.iter_mut() {
                carry += (*digit as u32) << 8;
                *digit = (carry % 58) as u8;
                carry /= 58;
            }
            while carry > 0 {
                digits.push((carry % 58) as u8);
                carry /= 58;
            }
        }

        let leading_zeros = input.iter().take_while(|&&b| b == 0).count();
        let mut out = String::with_capacity(leading_zeros + digits.len());
        for _ in 0..leading_zeros {
            out.push(self.alphabet[0] as char);
        }
        for &digit in digits.iter().rev() {
            out.push(self.alphabet[digit as usize] as char);
        }
        out
    }

    fn decode_base58(&self, text: &str) -> Option<SmallVec<[u8; 32]>> {
        // Little-endian base256 bytes
        let mut bytes: SmallVec<[u8; 32]> = SmallVec::new();
        for c in text.bytes() {
            let mut carry = self.alphabet.iter().position(|&a| a == c)? as u32;
            for byte in bytes.iter_mut() {
                carry += (*byte as u32) * 58;
                *byte = (carry & 0xff) as u8;
                carry >>= 8;
            }
            while carry > 0 {
                bytes.push((carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        let leading_zeros = text.bytes().take_while(|&c| c == self.alphabet[0]).count();
        bytes.extend(std::iter::repeat(0).take(leading_zeros));
        bytes.reverse();
        Some(bytes)
    }
}

impl Default for Base58AddressCodec {
    fn default() -> Self {
        Self::new(LEDGER_ALPHABET, ACCOUNT_ID_VERSION)
    }
}

impl AddressCodec for Base58AddressCodec {
    fn encode(&self, account: &[u8; ACCOUNT_ID_LEN]) -> String {
        let mut payload: SmallVec<[u8; 32]> = SmallVec::new();
        payload.push(self.version);
        payload.extend_from_slice(account);
        let checksum = Self::checksum(&payload);
        payload.extend_from_slice(&checksum);
        self.encode_base58(&payload)
    }

    fn decode(&self, text: &str) -> Option<[u8; ACCOUNT_ID_LEN]> {
        let bytes = self.decode_base58(text)?;
        if bytes.len() != 1 + ACCOUNT_ID_LEN + CHECKSUM_LEN || bytes[0] != self.version {
            return None;
        }

        let (payload, checksum) = bytes.split_at(1 + ACCOUNT_ID_LEN);
        if Self::checksum(payload)[..] != *checksum {
            return None;
        }

        let mut account = [0u8; ACCOUNT_ID_LEN];
        account.copy_from_slice(&payload[1..]);
        Some(account)
    }
}

/// Plain hex codec, for networks or tests that print accounts as raw hex
#[derive(Debug, Clone, Copy, Default)]
pub struct HexAddressCodec;

impl AddressCodec for HexAddressCodec {
    fn encode(&self, account: &[u8; ACCOUNT_ID_LEN]) -> String {
        hex::encode_upper(account)
    }

    fn decode(&self, text: &str) -> Option<[u8; ACCOUNT_ID_LEN]> {
        let mut account = [0u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(text, &mut account).ok()?;
        Some(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const GENESIS_HEX: &str = "B5F762798A53D543A014CAF8B297CFF8F2F937E8";

    fn genesis_bytes() -> [u8; ACCOUNT_ID_LEN] {
        let mut out = [0u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(GENESIS_HEX, &mut out).unwrap();
        out
    }

    #[test]
    fn test_encode_known_accounts() {
        let codec = Base58AddressCodec::default();
        assert_eq!(codec.encode(&[0u8; 20]), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");

        let mut one = [0u8; 20];
        one[19] = 1;
        assert_eq!(codec.encode(&one), "rrrrrrrrrrrrrrrrrrrrBZbvji");
        assert_eq!(codec.encode(&genesis_bytes()), GENESIS);
    }

    #[test]
    fn test_decode_known_accounts() {
        let codec = Base58AddressCodec::default();
        assert_eq!(codec.decode(GENESIS), Some(genesis_bytes()));
        assert_eq!(codec.decode("rrrrrrrrrrrrrrrrrrrrrhoLvTp"), Some([0u8; 20]));
    }

    #[test]
    fn test_widest_account_round_trip() {
        let codec = Base58AddressCodec::default();
        let widest = [0xFFu8; ACCOUNT_ID_LEN];
        let text = codec.encode(&widest);
        assert!(text.len() <= 35, "{text}");
        assert!(text.starts_with('r'), "{text}");
        assert_eq!(codec.decode(&text), Some(widest));
    }

    #[test]
    fn test_decode_rejects_bad_checksum_and_alphabet() {
        let codec = Base58AddressCodec::default();
        // last character altered
        assert_eq!(codec.decode("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTi"), None);
        // '0' and 'l' are not in the alphabet
        assert_eq!(codec.decode("rHb9CJAWyB4rj91VRWn96DkukG4bwdty0l"), None);
        assert_eq!(codec.decode(""), None);
    }

    #[test]
    fn test_hex_codec() {
        let codec = HexAddressCodec;
        assert_eq!(codec.encode(&genesis_bytes()), GENESIS_HEX);
        assert_eq!(codec.decode(GENESIS_HEX), Some(genesis_bytes()));
        assert_eq!(codec.decode("zz"), None);
    }
}
