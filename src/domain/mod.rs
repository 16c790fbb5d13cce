// ============================================================================
// Domain Models Module
// Identifiers, currencies and amounts with their text and JSON forms
// ============================================================================

pub mod amount;
pub mod config;
pub mod currency;
mod format;
pub mod identifier;
mod quality;
pub mod time;

pub use amount::{Amount, IssuedAmount, NativeAmount};
pub use config::{ArithmeticOptions, CurrencyFormat, HumanFormat, HumanParseOptions, QualityOptions};
pub use currency::{Currency, CurrencyKind, HEX_CURRENCY_BAD, LEGACY_NATIVE_TOKEN, NATIVE_TOKEN};
pub use identifier::{AccountId, FixedWidthId, UInt128, UInt160, UInt256};
pub use time::{LedgerTime, LEDGER_EPOCH_OFFSET, SECONDS_PER_YEAR};
