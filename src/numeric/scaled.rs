// ============================================================================
// Scaled Intermediates
// Unnormalized magnitudes used by multiplication, division and quality decoding
// ============================================================================

use super::errors::{AmountError, AmountResult};
use super::issued_value::IssuedValue;
use super::limits::{pow10, MAX_DROPS, MIN_MANTISSA};

/// Unsigned `value × 10^offset` with no normalization applied.
///
/// Native amounts enter as `(drops, 0)`, issued amounts as
/// `(mantissa, exponent)`. Products and quotients follow the ledger's
/// integer rules: the product is divided by 10^14 and biased by 7, the
/// quotient is taken over a 10^17 numerator and biased by 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaled {
    pub value: u128,
    pub offset: i64,
}

impl Scaled {
    #[inline]
    pub const fn new(value: u128, offset: i64) -> Self {
        Self { value, offset }
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Scale up until the value has at least 16 digits. Zero is unchanged.
    pub fn normalized(self) -> Self {
        let mut out = self;
        while out.value != 0 && out.value < MIN_MANTISSA as u128 {
            out.value *= 10;
            out.offset -= 1;
        }
        out
    }

    /// Product of two normalized operands.
    ///
    /// # Errors
    /// Returns `Overflow` if the intermediate product does not fit.
    pub fn mul(self, rhs: Self) -> AmountResult<Self> {
        let product = self
            .value
            .checked_mul(rhs.value)
            .ok_or(AmountError::Overflow)?;
        Ok(Self {
            value: product / pow10(14) + 7,
            offset: self.offset + rhs.offset + 14,
        })
    }

    /// Quotient of two normalized operands.
    ///
    /// # Errors
    /// Returns `DivideByZero` for a zero divisor, `Overflow` if the scaled
    /// numerator does not fit.
    pub fn div(self, rhs: Self) -> AmountResult<Self> {
        if rhs.value == 0 {
            return Err(AmountError::DivideByZero);
        }
        let numerator = self
            .value
            .checked_mul(pow10(17))
            .ok_or(AmountError::Overflow)?;
        Ok(Self {
            value: numerator / rhs.value + 5,
            offset: self.offset - rhs.offset - 17,
        })
    }

    /// Reciprocal over a 10^32 numerator, as used for inverted qualities.
    ///
    /// # Errors
    /// Returns `DivideByZero` for a zero value.
    pub fn invert(self) -> AmountResult<Self> {
        if self.value == 0 {
            return Err(AmountError::DivideByZero);
        }
        Ok(Self {
            value: pow10(32) / self.value,
            offset: -32 - self.offset,
        })
    }

    /// Bring the offset to zero, truncating fractional drops.
    ///
    /// # Errors
    /// Returns `Overflow` above `MAX_DROPS`.
    pub fn to_drops(self) -> AmountResult<u64> {
        let mut value = self.value;
        let mut offset = self.offset;

        while offset < 0 && value != 0 {
            value /= 10;
            offset += 1;
        }
        if value == 0 {
            return Ok(0);
        }
        while offset > 0 {
            value = value.checked_mul(10).ok_or(AmountError::Overflow)?;
            offset -= 1;
        }

        if value > MAX_DROPS as u128 {
            return Err(AmountError::Overflow);
        }
        Ok(value as u64)
    }

    /// Normalize into an issued value with the given sign.
    #[inline]
    pub fn to_issued(self, negative: bool) -> AmountResult<IssuedValue> {
        IssuedValue::from_parts(self.value, self.offset, negative)
    }
}

impl From<IssuedValue> for Scaled {
    #[inline]
    fn from(value: IssuedValue) -> Self {
        Self::new(value.mantissa() as u128, value.exponent() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drops(n: u128) -> Scaled {
        Scaled::new(n, 0).normalized()
    }

    #[test]
    fn test_normalized() {
        let s = Scaled::new(25, 0).normalized();
        assert_eq!(s.value, 2_500_000_000_000_000);
        assert_eq!(s.offset, -14);
        assert_eq!(Scaled::new(0, 3).normalized(), Scaled::new(0, 3));
    }

    #[test]
    fn test_native_mul_div_exact() {
        let product = drops(1_234_567).mul(drops(7)).unwrap();
        assert_eq!(product.to_drops().unwrap(), 8_641_969);

        let quotient = drops(8_641_969).div(drops(7)).unwrap();
        assert_eq!(quotient.to_drops().unwrap(), 1_234_567);
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(
            drops(5).div(Scaled::new(0, 0)),
            Err(AmountError::DivideByZero)
        );
        assert_eq!(Scaled::new(0, 0).invert(), Err(AmountError::DivideByZero));
    }

    #[test]
    fn test_invert() {
        let two = Scaled::from(IssuedValue::parse("2").unwrap());
        let half = two.invert().unwrap().to_issued(false).unwrap();
        assert_eq!(half, IssuedValue::parse("0.5").unwrap());
    }

    #[test]
    fn test_to_drops_overflow() {
        assert_eq!(
            Scaled::new(9, 18).to_drops(),
            Ok(9_000_000_000_000_000_000)
        );
        assert_eq!(Scaled::new(10, 18).to_drops(), Err(AmountError::Overflow));
    }
}
