// ============================================================================
// Ledger Amount Library
// Amounts, currency codes and identifiers for a distributed-ledger client
// ============================================================================

//! # Ledger Amount
//!
//! Value types shared by every layer of a ledger client.
//!
//! ## Features
//!
//! - **Fixed-width identifiers** (128/160/256-bit) with hex and account text
//! - **Currency codes** covering native, standard and demurrage encodings
//! - **Amounts** with the ledger's 16-digit truncating decimal arithmetic
//! - **Quality decoding** of order-book exchange rates
//!
//! ## Example
//!
//! ```rust
//! use ledger_amount::prelude::*;
//!
//! let fee = Amount::parse("0.1 STR");
//! assert_eq!(fee.drops(), Some(100_000));
//!
//! let issuer = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
//! let a = Amount::parse(&format!("150.02/USD/{issuer}"));
//! let b = Amount::parse(&format!("50.5/USD/{issuer}"));
//! let sum = a.add(&b).unwrap();
//! assert_eq!(sum.to_text_full(), format!("200.52/USD/{issuer}"));
//!
//! let gold = Currency::parse("XAU (-0.5%pa)");
//! assert_eq!(gold.kind(), CurrencyKind::Demurrage);
//! assert_eq!(gold.to_human(&CurrencyFormat::default()), "XAU (-0.5%pa)");
//! ```

pub mod domain;
pub mod interfaces;
pub mod numeric;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        AccountId, Amount, ArithmeticOptions, Currency, CurrencyFormat, CurrencyKind,
        FixedWidthId, HumanFormat, HumanParseOptions, LedgerTime, QualityOptions, UInt128,
        UInt160, UInt256,
    };
    pub use crate::interfaces::{AddressCodec, Base58AddressCodec};
    pub use crate::numeric::{AmountError, AmountResult, IssuedValue};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use crate::domain::SECONDS_PER_YEAR;

    const ISSUER_A: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const ISSUER_B: &str = "rrrrrrrrrrrrrrrrrrrrBZbvji";

    #[test]
    fn test_native_scenarios() {
        assert_eq!(Amount::parse("0.1 STR").drops(), Some(100_000));
        assert_eq!(Amount::parse("1 STR").drops(), Some(1_000_000));

        let zero = Amount::parse("-1").add(&Amount::parse("1")).unwrap();
        assert_eq!(zero.to_text(), "0");

        let sum = Amount::parse("150").add(&Amount::parse("50")).unwrap();
        assert_eq!(sum.to_text_full(), "0.0002/STR");
    }

    #[test]
    fn test_issued_sum() {
        let a = Amount::parse(&format!("150.02/USD/{ISSUER_A}"));
        let b = Amount::parse(&format!("50.5/USD/{ISSUER_A}"));
        assert_eq!(
            a.add(&b).unwrap().to_text_full(),
            format!("200.52/USD/{ISSUER_A}")
        );
    }

    #[test]
    fn test_divide_by_zero() {
        let result = Amount::parse("1").divide(&Amount::parse("0"));
        assert_eq!(result, Err(AmountError::DivideByZero));
    }

    #[test]
    fn test_demurrage_currency() {
        let gold = Currency::parse("XAU (-0.5%pa)");
        assert_eq!(gold.kind(), CurrencyKind::Demurrage);
        assert_eq!(gold.iso_code(), Some("XAU"));

        let one_year = LedgerTime::EPOCH.plus_seconds(SECONDS_PER_YEAR);
        assert_eq!(gold.interest_percentage_at(one_year, None), -0.5);
        assert_eq!(gold.to_human(&CurrencyFormat::default()), "XAU (-0.5%pa)");
    }

    #[test]
    fn test_not_equals_why() {
        let usd = Amount::parse(&format!("1/USD/{ISSUER_A}"));
        let eur = Amount::parse(&format!("1/EUR/{ISSUER_A}"));
        assert_eq!(
            usd.not_equals_why(&eur, false).as_deref(),
            Some("Non-native currency differs.")
        );

        let other = Amount::parse(&format!("1/USD/{ISSUER_B}"));
        assert_eq!(
            other.not_equals_why(&usd, false),
            Some(format!("Non-native issuer differs: {ISSUER_A}/{ISSUER_B}"))
        );
    }

    #[test]
    fn test_legacy_native_token() {
        let legacy = Amount::parse("2/XRP");
        let canonical = Amount::parse("2/STR");
        assert_eq!(legacy, canonical);
        assert_eq!(legacy.to_text_full(), "2/STR");
    }

    #[test]
    fn test_json_round_trip() {
        let amount = Amount::parse(&format!("-0.000123/USD/{ISSUER_A}"));
        assert_eq!(Amount::from_json(&amount.to_json()), amount);

        let native = Amount::parse("-42");
        assert_eq!(Amount::from_json(&native.to_json()), native);
    }

    #[test]
    fn test_quality_with_interest_bearing_base() {
        let rate = Amount::from_quality(
            "5511C37937E08000",
            Currency::from_iso("USD"),
            UInt160::parse_account(ISSUER_A),
            &QualityOptions::new().with_base_currency(Currency::native()),
        );
        assert_eq!(rate.to_human(&HumanFormat::display()), "5,000,000.00");
    }

    #[test]
    fn test_custom_codec() {
        let codec = crate::interfaces::HexAddressCodec;
        let id = UInt160::parse_account_with("1", &codec);
        assert_eq!(
            id.to_account_text_with(&codec).unwrap(),
            "0000000000000000000000000000000000000001"
        );
    }
}
