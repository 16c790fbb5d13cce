// ============================================================================
// Interfaces Module
// Defines the traits at the boundary with collaborating layers
// ============================================================================

pub mod address_codec;

pub use address_codec::{
    AddressCodec, Base58AddressCodec, HexAddressCodec, ACCOUNT_ID_LEN, LEDGER_ALPHABET,
};
