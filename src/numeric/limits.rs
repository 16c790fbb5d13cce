// ============================================================================
// Wire Limits
// Ranges the ledger's binary amount format can carry
// ============================================================================

/// Smallest non-zero issued mantissa (16 digits)
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;

/// Largest issued mantissa (16 digits)
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;

/// Number of significant digits an issued mantissa carries
pub const MAX_SIGNIFICANT_DIGITS: usize = 16;

/// Smallest exponent of a non-zero issued value; anything smaller underflows to zero
pub const MIN_EXPONENT: i32 = -96;

/// Largest exponent of an issued value
pub const MAX_EXPONENT: i32 = 80;

/// Exponent stored for an issued zero
pub const ZERO_EXPONENT: i32 = -100;

/// Drops per display unit of the native currency
pub const DROPS_PER_UNIT: u64 = 1_000_000;

/// Fractional digits of the native display unit
pub const NATIVE_PRECISION: usize = 6;

/// Largest native amount in drops
pub const MAX_DROPS: u64 = 9_000_000_000_000_000_000;

/// Compute 10^n at compile time
pub(crate) const fn pow10(n: u32) -> u128 {
    let mut result: u128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), 1);
        assert_eq!(pow10(6), DROPS_PER_UNIT as u128);
        assert_eq!(pow10(15), MIN_MANTISSA as u128);
        assert_eq!(pow10(16) - 1, MAX_MANTISSA as u128);
    }

    #[test]
    fn test_native_cap_fits_u64() {
        assert!(MAX_DROPS < u64::MAX);
    }
}
