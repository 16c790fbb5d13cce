// ============================================================================
// Issued Value
// Signed decimal with a 16-digit mantissa, as carried by issued amounts
// ============================================================================

use super::errors::{AmountError, AmountResult};
use super::limits::{
    MAX_EXPONENT, MAX_MANTISSA, MAX_SIGNIFICANT_DIGITS, MIN_EXPONENT, MIN_MANTISSA,
    ZERO_EXPONENT,
};
use std::cmp::Ordering;
use std::fmt;

/// Canonical signed decimal `mantissa × 10^exponent`.
///
/// A non-zero value always has a mantissa in
/// `[MIN_MANTISSA, MAX_MANTISSA]` and an exponent in
/// `[MIN_EXPONENT, MAX_EXPONENT]`. Zero is stored as mantissa 0 with
/// `ZERO_EXPONENT` and a positive sign, so structural equality is numeric
/// equality.
///
/// Normalization truncates toward zero; it never rounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedValue {
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl IssuedValue {
    /// Zero value
    pub const ZERO: Self = Self {
        mantissa: 0,
        exponent: ZERO_EXPONENT,
        negative: false,
    };

    /// One (1.0)
    pub const ONE: Self = Self {
        mantissa: MIN_MANTISSA,
        exponent: -15,
        negative: false,
    };

    // ========================================================================
    // Construction
    // ========================================================================

    /// Normalize an arbitrary magnitude and exponent.
    ///
    /// Digits beyond the 16th are truncated. An exponent below the wire
    /// range underflows to zero.
    ///
    /// # Errors
    /// Returns `Overflow` if the exponent exceeds `MAX_EXPONENT` after
    /// normalization.
    pub fn from_parts(magnitude: u128, exponent: i64, negative: bool) -> AmountResult<Self> {
        if magnitude == 0 {
            return Ok(Self::ZERO);
        }

        let mut magnitude = magnitude;
        let mut exponent = exponent;
        while magnitude < MIN_MANTISSA as u128 {
            magnitude *= 10;
            exponent -= 1;
        }
        while magnitude > MAX_MANTISSA as u128 {
            magnitude /= 10;
            exponent += 1;
        }

        if exponent < MIN_EXPONENT as i64 {
            return Ok(Self::ZERO);
        }
        if exponent > MAX_EXPONENT as i64 {
            return Err(AmountError::Overflow);
        }

        Ok(Self {
            mantissa: magnitude as u64,
            exponent: exponent as i32,
            negative,
        })
    }

    /// Parse decimal text: `-?digits[.digits][e±digits]`.
    ///
    /// Leading and trailing zeros are folded into the exponent. Returns
    /// `None` for malformed text, for more than 16 significant digits, or
    /// for an exponent beyond the wire range.
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (number, exponent) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exponent: i32 = body[pos + 1..].parse().ok()?;
                (&body[..pos], exponent as i64)
            },
            None => (body, 0),
        };

        let (int_digits, frac_digits) = number.split_once('.').unwrap_or((number, ""));
        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }
        if !int_digits.bytes().all(|b| b.is_ascii_digit())
            || !frac_digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let digits = format!("{int_digits}{frac_digits}");
        let without_leading = digits.trim_start_matches('0');
        let significant = without_leading.trim_end_matches('0');
        if significant.is_empty() {
            return Some(Self::ZERO);
        }
        if significant.len() > MAX_SIGNIFICANT_DIGITS {
            return None;
        }

        let exponent = exponent - frac_digits.len() as i64
            + (without_leading.len() - significant.len()) as i64;
        let magnitude: u64 = significant.parse().ok()?;
        Self::from_parts(magnitude as u128, exponent, negative).ok()
    }

    /// Convert a float, keeping its shortest round-trip digits truncated to 16.
    ///
    /// Returns `None` for NaN, infinities and values outside the wire range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::ZERO);
        }

        let text = format!("{:e}", value.abs());
        let (digits, exponent) = text.split_once('e')?;
        let exponent: i64 = exponent.parse().ok()?;
        let (int_digits, frac_digits) = digits.split_once('.').unwrap_or((digits, ""));

        let mut all = format!("{int_digits}{frac_digits}");
        let mut exponent = exponent - frac_digits.len() as i64;
        if all.len() > MAX_SIGNIFICANT_DIGITS {
            exponent += (all.len() - MAX_SIGNIFICANT_DIGITS) as i64;
            all.truncate(MAX_SIGNIFICANT_DIGITS);
        }

        let magnitude: u64 = all.parse().ok()?;
        Self::from_parts(magnitude as u128, exponent, value < 0.0).ok()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn mantissa(&self) -> u64 {
        self.mantissa
    }

    #[inline]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Mantissa with the sign applied.
    #[inline]
    pub const fn signed_mantissa(&self) -> i64 {
        if self.negative {
            -(self.mantissa as i64)
        } else {
            self.mantissa as i64
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Negation; zero stays positive.
    #[inline]
    pub const fn negate(self) -> Self {
        if self.mantissa == 0 {
            self
        } else {
            Self {
                negative: !self.negative,
                ..self
            }
        }
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self {
            negative: false,
            ..self
        }
    }

    /// Checked addition.
    ///
    /// The operand with the smaller exponent is shifted right until both
    /// exponents match, truncating its magnitude toward zero, then the sum
    /// is normalized (again truncating).
    ///
    /// # Errors
    /// Returns `Overflow` if the sum exceeds the wire range.
    pub fn checked_add(self, rhs: Self) -> AmountResult<Self> {
        if rhs.is_zero() {
            return Ok(self);
        }
        if self.is_zero() {
            return Ok(rhs);
        }

        let mut lhs_value = self.signed_mantissa() as i128;
        let mut rhs_value = rhs.signed_mantissa() as i128;
        let mut lhs_exponent = self.exponent;
        let mut rhs_exponent = rhs.exponent;

        while lhs_exponent < rhs_exponent {
            lhs_value /= 10;
            lhs_exponent += 1;
        }
        while rhs_exponent < lhs_exponent {
            rhs_value /= 10;
            rhs_exponent += 1;
        }

        let sum = lhs_value + rhs_value;
        Self::from_parts(sum.unsigned_abs(), lhs_exponent as i64, sum < 0)
    }

    /// Checked subtraction, see [`IssuedValue::checked_add`].
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> AmountResult<Self> {
        self.checked_add(rhs.negate())
    }

    /// Shift the decimal point: `self × 10^places`.
    ///
    /// # Errors
    /// Returns `Overflow` if the exponent leaves the wire range.
    pub fn scale_pow10(self, places: i32) -> AmountResult<Self> {
        if self.is_zero() {
            return Ok(self);
        }
        Self::from_parts(
            self.mantissa as u128,
            self.exponent as i64 + places as i64,
            self.negative,
        )
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// Ledger text form: plain decimal, or `<mantissa>e<exponent>` outside
    /// the exponent window `[-25, -5]`.
    pub fn to_text(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let sign = if self.negative { "-" } else { "" };
        if self.exponent != 0 && (self.exponent < -25 || self.exponent > -5) {
            return format!("{sign}{}e{}", self.mantissa, self.exponent);
        }

        let (int_part, frac_part) = self.decimal_digits();
        if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        }
    }

    /// Integer and fractional digits of the magnitude.
    ///
    /// The integer part has no leading zeros (`"0"` when empty); the
    /// fractional part has no trailing zeros.
    pub fn decimal_digits(&self) -> (String, String) {
        if self.is_zero() {
            return ("0".to_string(), String::new());
        }

        let digits = self.mantissa.to_string();
        if self.exponent >= 0 {
            return (
                format!("{digits}{}", "0".repeat(self.exponent as usize)),
                String::new(),
            );
        }

        let shift = self.exponent.unsigned_abs() as usize;
        let (int_part, frac_part) = if shift >= digits.len() {
            (
                String::new(),
                format!("{}{digits}", "0".repeat(shift - digits.len())),
            )
        } else {
            let split = digits.len() - shift;
            (digits[..split].to_string(), digits[split..].to_string())
        };

        let int_part = int_part.trim_start_matches('0');
        let int_part = if int_part.is_empty() { "0" } else { int_part };
        (
            int_part.to_string(),
            frac_part.trim_end_matches('0').to_string(),
        )
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for IssuedValue {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialOrd for IssuedValue {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IssuedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let signum = |v: &Self| -> i8 {
            if v.is_zero() {
                0
            } else if v.negative {
                -1
            } else {
                1
            }
        };

        match signum(self).cmp(&signum(other)) {
            Ordering::Equal if self.is_zero() => Ordering::Equal,
            Ordering::Equal => {
                let magnitude = self
                    .exponent
                    .cmp(&other.exponent)
                    .then(self.mantissa.cmp(&other.mantissa));
                if self.negative {
                    magnitude.reverse()
                } else {
                    magnitude
                }
            },
            unequal => unequal,
        }
    }
}

impl fmt::Debug for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IssuedValue({}, mantissa={}, exponent={})",
            self, self.mantissa, self.exponent
        )
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(text: &str) -> IssuedValue {
        IssuedValue::parse(text).unwrap()
    }

    #[test]
    fn test_constants() {
        assert!(IssuedValue::ZERO.is_zero());
        assert_eq!(IssuedValue::ZERO.exponent(), ZERO_EXPONENT);
        assert_eq!(IssuedValue::ONE, iv("1"));
    }

    #[test]
    fn test_from_parts_normalizes() {
        let x = IssuedValue::from_parts(15002, -2, false).unwrap();
        assert_eq!(x.mantissa(), 1_500_200_000_000_000);
        assert_eq!(x.exponent(), -13);
        assert_eq!(x.to_text(), "150.02");
    }

    #[test]
    fn test_from_parts_truncates() {
        // 17 digits, last one dropped rather than rounded
        let x = IssuedValue::from_parts(12_345_678_901_234_569, 0, false).unwrap();
        assert_eq!(x.mantissa(), 1_234_567_890_123_456);
        assert_eq!(x.exponent(), 1);
    }

    #[test]
    fn test_from_parts_range() {
        assert_eq!(
            IssuedValue::from_parts(1, -200, false).unwrap(),
            IssuedValue::ZERO
        );
        assert_eq!(
            IssuedValue::from_parts(1, 200, false),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(iv("1.2300"), iv("1.23"));
        assert_eq!(iv("123e-2"), iv("1.23"));
        assert_eq!(iv(".5"), iv("0.5"));
        assert_eq!(iv("-0"), IssuedValue::ZERO);
        assert_eq!(iv("0.000"), IssuedValue::ZERO);
        assert!(iv("-2.5").is_negative());
        assert_eq!(iv("1000000000000000e-3"), iv("1000000000000"));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(IssuedValue::parse(""), None);
        assert_eq!(IssuedValue::parse("."), None);
        assert_eq!(IssuedValue::parse("abc"), None);
        assert_eq!(IssuedValue::parse("1e"), None);
        assert_eq!(IssuedValue::parse("--1"), None);
        assert_eq!(IssuedValue::parse("1.2.3"), None);
        assert_eq!(IssuedValue::parse("1e200"), None);
        // 17 significant digits are rejected, not rounded
        assert_eq!(IssuedValue::parse("1.2345678901234567"), None);
        // trailing zeros do not count as significant
        assert!(IssuedValue::parse("1234567890123456000").is_some());
    }

    #[test]
    fn test_to_text_notation() {
        assert_eq!(iv("1").to_text(), "1");
        assert_eq!(iv("0.0001").to_text(), "0.0001");
        assert_eq!(iv("-12.5").to_text(), "-12.5");
        assert_eq!(iv("10000000000").to_text(), "10000000000");
        assert_eq!(iv("100000000000").to_text(), "1000000000000000e-4");
        assert_eq!(iv("1e-11").to_text(), "1000000000000000e-26");
        assert_eq!(iv("1e-10").to_text(), "0.0000000001");
        assert_eq!(iv("1e15").to_text(), "1000000000000000");
    }

    #[test]
    fn test_checked_add() {
        let a = iv("150.02");
        let b = iv("50.5");
        assert_eq!(a.checked_add(b).unwrap().to_text(), "200.52");
        assert_eq!(a.checked_sub(a).unwrap(), IssuedValue::ZERO);
        assert_eq!(iv("-1").checked_add(iv("3")).unwrap(), iv("2"));
    }

    #[test]
    fn test_checked_add_truncates_small_operand() {
        // 1e-20 vanishes when aligned to 1's exponent
        let sum = iv("1").checked_add(iv("1e-20")).unwrap();
        assert_eq!(sum, iv("1"));

        // 9999999999999999 + 1.9 -> truncated toward zero
        let sum = iv("9999999999999999").checked_add(iv("1.9")).unwrap();
        assert_eq!(sum.to_text(), "1000000000000000e1");
    }

    #[test]
    fn test_ordering() {
        assert!(iv("1") < iv("2"));
        assert!(iv("-2") < iv("-1"));
        assert!(iv("-1") < IssuedValue::ZERO);
        assert!(iv("0.5") < iv("5"));
        assert_eq!(iv("1.10").cmp(&iv("1.1")), Ordering::Equal);
    }

    #[test]
    fn test_negate_and_abs() {
        let x = iv("3.5");
        assert_eq!(x.negate().negate(), x);
        assert_eq!(x.negate().abs(), x);
        assert_eq!(IssuedValue::ZERO.negate(), IssuedValue::ZERO);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(IssuedValue::from_f64(0.995).unwrap(), iv("0.995"));
        assert_eq!(IssuedValue::from_f64(-2.0).unwrap(), iv("-2"));
        assert_eq!(IssuedValue::from_f64(0.0).unwrap(), IssuedValue::ZERO);
        assert_eq!(IssuedValue::from_f64(f64::NAN), None);

        // 17 round-trip digits are truncated to 16
        let x = IssuedValue::from_f64(0.1 + 0.2).unwrap();
        assert_eq!(x.mantissa(), 3_000_000_000_000_000);
    }

    #[test]
    fn test_scale_pow10() {
        assert_eq!(iv("1.5").scale_pow10(6).unwrap(), iv("1500000"));
        assert_eq!(iv("1.5").scale_pow10(-6).unwrap(), iv("0.0000015"));
    }
}
