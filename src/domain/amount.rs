// ============================================================================
// Amount
// Native drops or issued decimal values with currency and issuer
// ============================================================================

use crate::domain::config::{ArithmeticOptions, CurrencyFormat, HumanFormat, HumanParseOptions};
use crate::domain::currency::{Currency, NATIVE_TOKEN};
use crate::domain::format::render_human;
use crate::domain::identifier::UInt160;
use crate::domain::time::LedgerTime;
use crate::numeric::limits::{pow10, DROPS_PER_UNIT, MAX_DROPS, NATIVE_PRECISION};
use crate::numeric::{AmountError, AmountResult, IssuedValue, Scaled};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Signed count of drops, the smallest native unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeAmount {
    drops: u64,
    negative: bool,
}

impl NativeAmount {
    /// Zero is always positive
    #[inline]
    fn new(drops: u64, negative: bool) -> Self {
        Self {
            drops,
            negative: negative && drops != 0,
        }
    }

    /// Magnitude in drops
    #[inline]
    pub const fn drops(&self) -> u64 {
        self.drops
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub const fn signed_drops(&self) -> i64 {
        if self.negative {
            -(self.drops as i64)
        } else {
            self.drops as i64
        }
    }
}

/// Decimal value denominated in a non-native currency held by an issuer
#[derive(Debug, Clone, Copy)]
pub struct IssuedAmount {
    value: IssuedValue,
    currency: Currency,
    issuer: UInt160,
}

impl IssuedAmount {
    #[inline]
    pub const fn value(&self) -> IssuedValue {
        self.value
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub const fn issuer(&self) -> UInt160 {
        self.issuer
    }

    fn same_denomination(&self, other: &Self) -> bool {
        self.currency.equals(&other.currency) && self.issuer.equals(&other.issuer)
    }
}

/// A ledger amount.
///
/// Parsing never fails loudly: malformed input produces
/// [`Amount::Invalid`], which is unequal to everything and rejected by
/// every arithmetic operation.
#[derive(Debug, Clone, Copy)]
pub enum Amount {
    Invalid,
    Native(NativeAmount),
    Issued(IssuedAmount),
}

impl Amount {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Native amount from signed drops; beyond `MAX_DROPS` yields invalid.
    pub fn from_drops(drops: i64) -> Self {
        if drops.unsigned_abs() > MAX_DROPS {
            return Self::Invalid;
        }
        Self::Native(NativeAmount::new(drops.unsigned_abs(), drops < 0))
    }

    #[inline]
    pub fn native_zero() -> Self {
        Self::Native(NativeAmount::new(0, false))
    }

    /// Amount from a decimal value in `currency`. A native currency takes
    /// the value in display units and requires it to be a whole number of
    /// drops.
    pub fn issued(value: IssuedValue, currency: Currency, issuer: UInt160) -> Self {
        if !currency.is_valid() {
            return Self::Invalid;
        }
        if currency.is_native() {
            return native_from_units(value);
        }
        if !issuer.is_valid() {
            return Self::Invalid;
        }
        Self::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        })
    }

    /// Zero in the given denomination
    pub fn zero_in(currency: Currency, issuer: UInt160) -> Self {
        Self::issued(IssuedValue::ZERO, currency, issuer)
    }

    /// Parse the JSON forms: a string or number (see [`Amount::parse`]),
    /// or an object with `value`, `currency` and `issuer` fields.
    pub fn from_json(json: &Value) -> Self {
        let amount = match json {
            Value::String(text) => Self::parse(text),
            Value::Number(number) => Self::parse(&number.to_string()),
            Value::Object(map) => Self::from_json_object(map),
            _ => Self::Invalid,
        };
        if !amount.is_valid() {
            trace!("Rejected amount JSON: {}", json);
        }
        amount
    }

    fn from_json_object(map: &Map<String, Value>) -> Self {
        let Some(value) = map.get("value").and_then(json_text) else {
            return Self::Invalid;
        };
        let currency = map
            .get("currency")
            .and_then(json_text)
            .map_or_else(Currency::invalid, |text| Currency::parse(&text));
        let issuer = map
            .get("issuer")
            .and_then(json_text)
            .map_or_else(UInt160::invalid, |text| UInt160::parse_account(&text));
        Self::from_parts(&value, currency, issuer)
    }

    /// Parse amount text.
    ///
    /// - `value/currency[/issuer]`: issuer defaults to the `one` account;
    ///   a native currency reads `value` in display units
    /// - `-?digits`: native drops
    /// - `-?digits.digits`: native display units, at most six decimals
    /// - `<number> <currency>`: see [`Amount::from_human`]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let amount = match text.split_once('/') {
            Some((value, rest)) => {
                let (currency, issuer) = match rest.split_once('/') {
                    Some((currency, issuer)) => (currency, Some(issuer)),
                    None => (rest, None),
                };
                if value.is_empty() || currency.is_empty() {
                    Self::Invalid
                } else {
                    let issuer = issuer.map_or_else(UInt160::one, UInt160::parse_account);
                    Self::from_parts(value, Currency::parse(currency), issuer)
                }
            },
            None if text.contains(char::is_whitespace) => {
                parse_human(text, &HumanParseOptions::default()).unwrap_or(Self::Invalid)
            },
            None => parse_native_text(text),
        };
        if !amount.is_valid() {
            trace!("Rejected amount text: {:?}", text);
        }
        amount
    }

    /// Amount from decimal text plus currency and issuer.
    pub fn from_parts(value: &str, currency: Currency, issuer: UInt160) -> Self {
        let value = value.trim();
        if currency.is_valid() && currency.is_native() {
            if let Some(amount) = parse_native_units(value) {
                return amount;
            }
        }
        match IssuedValue::parse(value) {
            Some(value) => Self::issued(value, currency, issuer),
            None => Self::Invalid,
        }
    }

    /// Parse `<number> [currency]` or `<currency> <number>`.
    ///
    /// Without a currency the number is native display units with excess
    /// decimals truncated. Issued values keep at most 16 significant
    /// digits. With a reference time, interest accrued on the currency up
    /// to that time is removed.
    pub fn from_human(text: &str, options: &HumanParseOptions) -> Self {
        let amount = parse_human(text.trim(), options).unwrap_or(Self::Invalid);
        if !amount.is_valid() {
            trace!("Rejected human amount: {:?}", text);
        }
        amount
    }

    /// Amount from a [`Decimal`]. Issued values are truncated to 16
    /// significant digits; native values must be whole drops.
    pub fn from_decimal(value: Decimal, currency: Currency, issuer: UInt160) -> Self {
        if currency.is_valid() && currency.is_native() {
            return parse_native_units(&value.normalize().to_string()).unwrap_or(Self::Invalid);
        }
        let mantissa = value.mantissa();
        let exponent = -(value.scale() as i64);
        match IssuedValue::from_parts(mantissa.unsigned_abs(), exponent, mantissa < 0) {
            Ok(value) => Self::issued(value, currency, issuer),
            Err(_) => Self::Invalid,
        }
    }

    // ========================================================================
    // Predicates and Accessors
    // ========================================================================

    #[inline]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    #[inline]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Invalid => false,
            Self::Native(native) => native.drops == 0,
            Self::Issued(issued) => issued.value.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Invalid => false,
            Self::Native(native) => native.negative,
            Self::Issued(issued) => issued.value.is_negative(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.is_valid() && !self.is_zero() && !self.is_negative()
    }

    /// Native currency for native amounts, invalid for invalid ones
    pub fn currency(&self) -> Currency {
        match self {
            Self::Invalid => Currency::invalid(),
            Self::Native(_) => Currency::native(),
            Self::Issued(issued) => issued.currency,
        }
    }

    /// Issuer of an issued amount
    pub fn issuer(&self) -> Option<UInt160> {
        match self {
            Self::Issued(issued) => Some(issued.issuer),
            _ => None,
        }
    }

    /// Signed drops of a native amount
    pub fn drops(&self) -> Option<i64> {
        match self {
            Self::Native(native) => Some(native.signed_drops()),
            _ => None,
        }
    }

    /// Mantissa of an issued amount (0 for zero)
    pub fn mantissa(&self) -> Option<u64> {
        self.issued_value().map(|value| value.mantissa())
    }

    /// Exponent of an issued amount (-100 for zero)
    pub fn exponent(&self) -> Option<i32> {
        self.issued_value().map(|value| value.exponent())
    }

    /// Decimal value of an issued amount
    pub fn issued_value(&self) -> Option<IssuedValue> {
        match self {
            Self::Issued(issued) => Some(issued.value),
            _ => None,
        }
    }

    /// Exact decimal form; native amounts are in display units.
    ///
    /// Returns `None` for invalid amounts and for magnitudes a
    /// [`Decimal`] cannot hold.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Invalid => None,
            Self::Native(native) => Some(Decimal::new(
                native.signed_drops(),
                NATIVE_PRECISION as u32,
            )),
            Self::Issued(issued) => {
                let value = issued.value;
                if value.is_zero() {
                    return Some(Decimal::ZERO);
                }
                let mut mantissa = value.signed_mantissa() as i128;
                let exponent = value.exponent();
                if exponent >= 0 {
                    let scaled = 10i128
                        .checked_pow(exponent as u32)
                        .and_then(|p| mantissa.checked_mul(p))?;
                    return Decimal::try_from_i128_with_scale(scaled, 0).ok();
                }
                let mut scale = exponent.unsigned_abs();
                if scale > 28 {
                    // divisors past i128 leave nothing of a 16-digit mantissa
                    match 10i128.checked_pow(scale - 28) {
                        Some(divisor) => mantissa /= divisor,
                        None => return Some(Decimal::ZERO),
                    }
                    scale = 28;
                }
                Decimal::try_from_i128_with_scale(mantissa, scale)
                    .ok()
                    .map(|d| d.normalize())
            },
        }
    }

    /// Replace the issuer of an issued amount; other amounts are unchanged.
    pub fn with_issuer(&self, issuer: UInt160) -> Self {
        match self {
            Self::Issued(issued) if issuer.is_valid() => Self::Issued(IssuedAmount {
                issuer,
                ..*issued
            }),
            Self::Issued(_) => Self::Invalid,
            other => *other,
        }
    }

    /// Replace the currency of an issued amount. Moving between native and
    /// issued denominations yields invalid.
    pub fn with_currency(&self, currency: Currency) -> Self {
        match self {
            Self::Issued(issued) if currency.is_valid() && !currency.is_native() => {
                Self::Issued(IssuedAmount {
                    currency,
                    ..*issued
                })
            },
            Self::Native(_) if currency.is_native() => *self,
            _ => Self::Invalid,
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Sum of two amounts of the same denomination.
    ///
    /// # Errors
    /// `InvalidOperation` for invalid operands or mismatched denominations,
    /// `Overflow` when the result leaves the representable range.
    pub fn add(&self, other: &Self) -> AmountResult<Self> {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => {
                let sum = a.signed_drops() as i128 + b.signed_drops() as i128;
                if sum.unsigned_abs() > MAX_DROPS as u128 {
                    return Err(AmountError::Overflow);
                }
                Ok(Self::Native(NativeAmount::new(
                    sum.unsigned_abs() as u64,
                    sum < 0,
                )))
            },
            (Self::Issued(a), Self::Issued(b)) if a.same_denomination(b) => {
                Ok(Self::Issued(IssuedAmount {
                    value: a.value.checked_add(b.value)?,
                    ..*a
                }))
            },
            _ => {
                debug!("Rejected addition of {} and {}", self, other);
                Err(AmountError::InvalidOperation)
            },
        }
    }

    /// `self - other`, see [`Amount::add`].
    pub fn subtract(&self, other: &Self) -> AmountResult<Self> {
        self.add(&other.negate())
    }

    /// Product in the denomination of `self`.
    ///
    /// Native operands take part as drops. Products follow the ledger's
    /// `÷10^14 + 7` rule on 16-digit mantissas, so a native product of 17
    /// or more digits is not exact integer multiplication.
    ///
    /// # Errors
    /// `InvalidOperation` for invalid operands, `Overflow` when the result
    /// leaves the representable range.
    pub fn multiply(&self, other: &Self) -> AmountResult<Self> {
        let (lhs, lhs_negative) = self.operand()?;
        let (rhs, rhs_negative) = other.operand()?;
        if lhs.is_zero() {
            return Ok(*self);
        }
        if rhs.is_zero() {
            return Ok(self.zero_like());
        }

        let product = lhs.normalized().mul(rhs.normalized())?;
        self.rebuild(product, lhs_negative != rhs_negative)
    }

    /// Quotient in the denomination of `self`.
    ///
    /// # Errors
    /// `InvalidOperation` for invalid operands (checked first),
    /// `DivideByZero` for a zero divisor, `Overflow` when the result
    /// leaves the representable range.
    pub fn divide(&self, other: &Self) -> AmountResult<Self> {
        let (lhs, lhs_negative) = self.operand()?;
        let (rhs, rhs_negative) = other.operand()?;
        if rhs.is_zero() {
            return Err(AmountError::DivideByZero);
        }
        if lhs.is_zero() {
            return Ok(*self);
        }

        let quotient = lhs.normalized().div(rhs.normalized())?;
        self.rebuild(quotient, lhs_negative != rhs_negative)
    }

    /// Reciprocal in the same denomination. Native amounts are inverted in
    /// display units.
    pub fn invert(&self) -> AmountResult<Self> {
        let one = match self {
            Self::Invalid => return Err(AmountError::InvalidOperation),
            Self::Native(_) => Self::Native(NativeAmount::new(DROPS_PER_UNIT * DROPS_PER_UNIT, false)),
            Self::Issued(issued) => Self::Issued(IssuedAmount {
                value: IssuedValue::ONE,
                ..*issued
            }),
        };
        one.divide(self)
    }

    pub fn negate(&self) -> Self {
        match self {
            Self::Invalid => Self::Invalid,
            Self::Native(native) => Self::Native(NativeAmount::new(native.drops, !native.negative)),
            Self::Issued(issued) => Self::Issued(IssuedAmount {
                value: issued.value.negate(),
                ..*issued
            }),
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            *self
        }
    }

    /// Value of an interest-bearing amount at `time`; other amounts are
    /// returned unchanged.
    pub fn apply_interest(&self, time: LedgerTime) -> AmountResult<Self> {
        match self {
            Self::Invalid => Err(AmountError::InvalidOperation),
            Self::Issued(issued) if issued.currency.has_interest() => {
                let factor = interest_factor(&issued.currency, time)?;
                self.scale_by(factor, false)
            },
            _ => Ok(*self),
        }
    }

    /// Remove interest accrued up to `time`; the inverse of
    /// [`Amount::apply_interest`].
    pub(crate) fn remove_interest(&self, currency: &Currency, time: LedgerTime) -> AmountResult<Self> {
        if !currency.has_interest() {
            return Ok(*self);
        }
        let factor = interest_factor(currency, time)?;
        self.scale_by(factor, true)
    }

    /// Product where a native `factor` counts in display units.
    pub fn product_human(&self, factor: &Self, options: &ArithmeticOptions) -> AmountResult<Self> {
        let mut product = *self;
        if let Some(time) = options.reference_time {
            product = product.apply_interest(time)?;
        }
        product = product.multiply(factor)?;
        if factor.is_native() {
            product = product.shift_decimal(-(NATIVE_PRECISION as i32))?;
        }
        Ok(product)
    }

    /// Quotient where a native `denominator` counts in display units.
    pub fn ratio_human(&self, denominator: &Self, options: &ArithmeticOptions) -> AmountResult<Self> {
        if !self.is_valid() || !denominator.is_valid() {
            return Err(AmountError::InvalidOperation);
        }
        if denominator.is_zero() {
            return Err(AmountError::DivideByZero);
        }

        let mut numerator = *self;
        if let Some(time) = options.reference_time {
            numerator = numerator.apply_interest(time)?;
        }
        if denominator.is_native() {
            numerator = numerator.shift_decimal(NATIVE_PRECISION as i32)?;
        }
        numerator.divide(denominator)
    }

    /// Magnitude and sign as a scaled intermediate
    fn operand(&self) -> AmountResult<(Scaled, bool)> {
        match self {
            Self::Invalid => Err(AmountError::InvalidOperation),
            Self::Native(native) => Ok((Scaled::new(native.drops as u128, 0), native.negative)),
            Self::Issued(issued) if issued.value.is_zero() => Ok((Scaled::new(0, 0), false)),
            Self::Issued(issued) => Ok((Scaled::from(issued.value), issued.value.is_negative())),
        }
    }

    /// Normalize a scaled magnitude into the denomination of `self`
    pub(crate) fn rebuild(&self, magnitude: Scaled, negative: bool) -> AmountResult<Self> {
        match self {
            Self::Invalid => Err(AmountError::InvalidOperation),
            Self::Native(_) => Ok(Self::Native(NativeAmount::new(
                magnitude.to_drops()?,
                negative,
            ))),
            Self::Issued(issued) => Ok(Self::Issued(IssuedAmount {
                value: magnitude.to_issued(negative)?,
                ..*issued
            })),
        }
    }

    fn zero_like(&self) -> Self {
        match self {
            Self::Invalid => Self::Invalid,
            Self::Native(_) => Self::native_zero(),
            Self::Issued(issued) => Self::Issued(IssuedAmount {
                value: IssuedValue::ZERO,
                ..*issued
            }),
        }
    }

    fn scale_by(&self, factor: IssuedValue, divide: bool) -> AmountResult<Self> {
        let (magnitude, negative) = self.operand()?;
        if magnitude.is_zero() && !divide {
            return Ok(*self);
        }

        let factor_scaled = if factor.is_zero() {
            Scaled::new(0, 0)
        } else {
            Scaled::from(factor)
        };
        let scaled = if divide {
            if factor_scaled.is_zero() {
                return Err(AmountError::DivideByZero);
            }
            if magnitude.is_zero() {
                return Ok(*self);
            }
            magnitude.normalized().div(factor_scaled)?
        } else {
            if factor_scaled.is_zero() {
                return Ok(self.zero_like());
            }
            magnitude.normalized().mul(factor_scaled)?
        };
        self.rebuild(scaled, negative != factor.is_negative())
    }

    /// `self × 10^places`, truncating fractional drops
    fn shift_decimal(&self, places: i32) -> AmountResult<Self> {
        match self {
            Self::Invalid => Err(AmountError::InvalidOperation),
            Self::Native(native) => Ok(Self::Native(NativeAmount::new(
                Scaled::new(native.drops as u128, places as i64).to_drops()?,
                native.negative,
            ))),
            Self::Issued(issued) => Ok(Self::Issued(IssuedAmount {
                value: issued.value.scale_pow10(places)?,
                ..*issued
            })),
        }
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Equality of value, sign and denomination; invalid amounts are never
    /// equal.
    pub fn equals(&self, other: &Self, ignore_issuer: bool) -> bool {
        self.not_equals_why(other, ignore_issuer).is_none()
    }

    /// Why two amounts differ, or `None` when they are equal.
    pub fn not_equals_why(&self, other: &Self, ignore_issuer: bool) -> Option<String> {
        let reason = match (self, other) {
            (Self::Invalid, _) | (_, Self::Invalid) => "Invalid amount.".to_string(),
            (Self::Native(a), Self::Native(b)) => {
                if a.drops != b.drops {
                    "Native value differs.".to_string()
                } else if a.negative != b.negative {
                    "Native sign differs.".to_string()
                } else {
                    return None;
                }
            },
            (Self::Issued(a), Self::Issued(b)) => {
                if a.value.abs() != b.value.abs() {
                    "Non-native value differs.".to_string()
                } else if a.value.is_negative() != b.value.is_negative() {
                    "Non-native sign differs.".to_string()
                } else if !a.currency.equals(&b.currency) {
                    "Non-native currency differs.".to_string()
                } else if !ignore_issuer && !a.issuer.equals(&b.issuer) {
                    let mut issuers = [account_text(&a.issuer), account_text(&b.issuer)];
                    issuers.sort();
                    format!("Non-native issuer differs: {}/{}", issuers[0], issuers[1])
                } else {
                    return None;
                }
            },
            _ => "Native mismatch.".to_string(),
        };
        Some(reason)
    }

    /// Order two amounts of the same denomination.
    ///
    /// # Errors
    /// `InvalidOperation` for invalid operands or mismatched denominations.
    pub fn compare(&self, other: &Self) -> AmountResult<Ordering> {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => Ok(a.signed_drops().cmp(&b.signed_drops())),
            (Self::Issued(a), Self::Issued(b)) if a.same_denomination(b) => {
                Ok(a.value.cmp(&b.value))
            },
            _ => Err(AmountError::InvalidOperation),
        }
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// Ledger text of the value alone: signed drops for native amounts,
    /// see [`IssuedValue::to_text`] for issued ones. Invalid prints `"0"`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Invalid => "0".to_string(),
            Self::Native(native) => native.signed_drops().to_string(),
            Self::Issued(issued) => issued.value.to_text(),
        }
    }

    /// Human decimal; native amounts are in display units.
    pub fn to_human(&self, format: &HumanFormat) -> String {
        match self {
            Self::Invalid => "0".to_string(),
            Self::Native(native) => {
                let int_part = (native.drops / DROPS_PER_UNIT).to_string();
                let frac_part = format!(
                    "{:0width$}",
                    native.drops % DROPS_PER_UNIT,
                    width = NATIVE_PRECISION
                );
                render_human(native.negative, &int_part, &frac_part, format)
            },
            Self::Issued(issued) => {
                let (int_part, frac_part) = issued.value.decimal_digits();
                render_human(issued.value.is_negative(), &int_part, &frac_part, format)
            },
        }
    }

    /// `value/currency/issuer`, or `units/STR` for native amounts. The
    /// currency is printed losslessly, see [`Currency::to_text`].
    pub fn to_text_full(&self) -> String {
        match self {
            Self::Invalid => "0".to_string(),
            Self::Native(_) => format!("{}/{}", self.to_human(&HumanFormat::plain()), NATIVE_TOKEN),
            Self::Issued(issued) => format!(
                "{}/{}/{}",
                self.to_text(),
                issued.currency.to_text(),
                account_text(&issued.issuer)
            ),
        }
    }

    /// Human value followed by the currency and, for issued amounts, the
    /// issuer.
    pub fn to_human_full(&self, format: &HumanFormat) -> String {
        match self {
            Self::Invalid => "0".to_string(),
            Self::Native(_) => format!("{}/{}", self.to_human(format), NATIVE_TOKEN),
            Self::Issued(issued) => format!(
                "{}/{}/{}",
                self.to_human(format),
                issued.currency.to_human(&CurrencyFormat::default()),
                account_text(&issued.issuer)
            ),
        }
    }

    /// Native: a string of drops. Issued: `{value, currency, issuer}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Invalid | Self::Native(_) => Value::String(self.to_text()),
            Self::Issued(issued) => {
                let mut map = Map::new();
                map.insert("value".to_string(), Value::String(self.to_text()));
                map.insert(
                    "currency".to_string(),
                    issued.currency.to_exact_json(),
                );
                map.insert(
                    "issuer".to_string(),
                    Value::String(account_text(&issued.issuer)),
                );
                Value::Object(map)
            },
        }
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn account_text(issuer: &UInt160) -> String {
    issuer
        .to_account_text()
        .unwrap_or_else(|| "NaN".to_string())
}

fn interest_factor(currency: &Currency, time: LedgerTime) -> AmountResult<IssuedValue> {
    IssuedValue::from_f64(currency.interest_at(time)).ok_or(AmountError::Overflow)
}

/// Display units to drops; values finer than one drop yield invalid.
fn native_from_units(value: IssuedValue) -> Amount {
    if value.is_zero() {
        return Amount::native_zero();
    }

    let shift = value.exponent() as i64 + NATIVE_PRECISION as i64;
    let mantissa = value.mantissa() as u128;
    let drops = if shift >= 0 {
        if shift > 20 {
            return Amount::Invalid;
        }
        mantissa.checked_mul(pow10(shift as u32))
    } else {
        let divisor_exp = shift.unsigned_abs() as u32;
        if divisor_exp > 38 {
            return Amount::Invalid;
        }
        let divisor = pow10(divisor_exp);
        (mantissa % divisor == 0).then(|| mantissa / divisor)
    };

    match drops {
        Some(drops) if drops <= MAX_DROPS as u128 => {
            Amount::Native(NativeAmount::new(drops as u64, value.is_negative()))
        },
        _ => Amount::Invalid,
    }
}

/// Digits of display units to drops. More than six decimals is an error
/// unless `truncate` is set.
fn units_to_drops(int_digits: &str, frac_digits: &str, truncate: bool) -> Option<u64> {
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    if !int_digits.bytes().all(|b| b.is_ascii_digit())
        || !frac_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let frac_digits = if frac_digits.len() > NATIVE_PRECISION {
        if !truncate {
            return None;
        }
        &frac_digits[..NATIVE_PRECISION]
    } else {
        frac_digits
    };

    let units: u128 = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().ok()?
    };
    let fraction: u128 = format!("{frac_digits:0<width$}", width = NATIVE_PRECISION)
        .parse()
        .ok()?;
    let drops = units
        .checked_mul(DROPS_PER_UNIT as u128)?
        .checked_add(fraction)?;
    (drops <= MAX_DROPS as u128).then_some(drops as u64)
}

/// `-?digits[.digits]` in display units, at most six decimals
fn parse_native_units(text: &str) -> Option<Amount> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_digits, frac_digits) = body.split_once('.').unwrap_or((body, ""));
    let drops = units_to_drops(int_digits, frac_digits, false)?;
    Some(Amount::Native(NativeAmount::new(drops, negative)))
}

/// `-?digits` in drops or `-?digits.digits` in display units
fn parse_native_text(text: &str) -> Amount {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let drops = match body.split_once('.') {
        Some((int_digits, frac_digits)) => units_to_drops(int_digits, frac_digits, false),
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => body
            .parse::<u128>()
            .ok()
            .filter(|&drops| drops <= MAX_DROPS as u128)
            .map(|drops| drops as u64),
        None => None,
    };

    match drops {
        Some(drops) => Amount::Native(NativeAmount::new(drops, negative)),
        None => Amount::Invalid,
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

fn parse_human(text: &str, options: &HumanParseOptions) -> Option<Amount> {
    let starts_with_number = text.chars().next().is_some_and(is_number_char);
    let (number, currency_text) = if starts_with_number {
        let end = text.find(|c| !is_number_char(c)).unwrap_or(text.len());
        (&text[..end], text[end..].trim())
    } else {
        let (currency_text, number) = text.rsplit_once(char::is_whitespace)?;
        (number, currency_text.trim())
    };

    let currency = if currency_text.is_empty() {
        Currency::native()
    } else {
        Currency::parse(currency_text)
    };
    if !currency.is_valid() {
        return None;
    }

    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.strip_prefix('+').unwrap_or(number)),
    };

    if currency.is_native() {
        let (int_digits, frac_digits) = digits.split_once('.').unwrap_or((digits, ""));
        let drops = units_to_drops(int_digits, frac_digits, true)?;
        return Some(Amount::Native(NativeAmount::new(drops, negative)));
    }

    let value = IssuedValue::parse(digits)?;
    let value = if negative { value.negate() } else { value };
    let amount = Amount::issued(value, currency, UInt160::one());
    match options.reference_time {
        Some(time) => amount.remove_interest(&currency, time).ok(),
        None => Some(amount),
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl FromStr for Amount {
    type Err = Infallible;

    /// Never fails; malformed text yields [`Amount::Invalid`].
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(text))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::native_zero()
    }
}

impl From<NativeAmount> for Amount {
    fn from(value: NativeAmount) -> Self {
        Self::Native(value)
    }
}

impl From<IssuedAmount> for Amount {
    fn from(value: IssuedAmount) -> Self {
        Self::Issued(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text_full())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_json(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = <Value as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_json(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn amount(text: &str) -> Amount {
        let a = Amount::parse(text);
        assert!(a.is_valid(), "{text} should parse");
        a
    }

    fn usd(value: &str) -> Amount {
        amount(&format!("{value}/USD/{ISSUER}"))
    }

    #[test]
    fn test_native_text() {
        assert_eq!(amount("150").drops(), Some(150));
        assert_eq!(amount("-1").drops(), Some(-1));
        assert_eq!(amount("1.5").drops(), Some(1_500_000));
        assert_eq!(amount(".000001").drops(), Some(1));
        assert_eq!(amount("-0").drops(), Some(0));
        assert!(!amount("-0").is_negative());

        assert!(!Amount::parse("1.0000001").is_valid());
        assert!(!Amount::parse("9000000000000000001").is_valid());
        assert!(!Amount::parse("").is_valid());
        assert!(!Amount::parse("-").is_valid());
        assert!(!Amount::parse(".").is_valid());
        assert!(!Amount::parse("1e5").is_valid());
    }

    #[test]
    fn test_parse_with_currency_suffix() {
        assert_eq!(amount("0.1 STR").drops(), Some(100_000));
        assert_eq!(amount("1 STR").drops(), Some(1_000_000));
        assert_eq!(amount("2.5 USD").to_text(), "2.5");
    }

    #[test]
    fn test_from_str_and_accessors() {
        let a: Amount = "1.5/USD".parse().unwrap();
        assert_eq!(a.mantissa(), Some(1_500_000_000_000_000));
        assert_eq!(a.exponent(), Some(-15));
        assert_eq!(usd("0").exponent(), Some(-100));
        assert_eq!(amount("5").mantissa(), None);

        let bad: Amount = "garbage".parse().unwrap();
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_max_drops() {
        assert_eq!(amount("9000000000000000000").drops(), Some(9_000_000_000_000_000_000));
        assert!(Amount::from_drops(9_000_000_000_000_000_000).is_valid());
        assert!(!Amount::from_drops(i64::MAX).is_valid());
    }

    #[test]
    fn test_issued_text() {
        let a = usd("150.02");
        assert!(!a.is_native());
        assert_eq!(a.currency().iso_code(), Some("USD"));
        assert_eq!(a.issuer(), Some(UInt160::parse_account(ISSUER)));
        assert_eq!(a.to_text(), "150.02");

        let default_issuer = amount("1/USD");
        assert_eq!(default_issuer.issuer(), Some(UInt160::one()));

        assert!(!Amount::parse("1/USD/bogus").is_valid());
        assert!(!Amount::parse("abc/USD").is_valid());
        assert!(!Amount::parse("/USD").is_valid());
        assert!(!Amount::parse("1//").is_valid());
        assert!(!Amount::parse("12345678901234567/USD").is_valid());
    }

    #[test]
    fn test_native_currency_triple() {
        assert_eq!(amount("1/STR").drops(), Some(1_000_000));
        assert_eq!(amount("0.0002/XRP").drops(), Some(200));
        assert!(!Amount::parse("0.0000001/STR").is_valid());
        assert_eq!(
            amount("1234567891234.567891/STR").drops(),
            Some(1_234_567_891_234_567_891)
        );
        assert_eq!(amount("1e3/STR").drops(), Some(1_000_000_000));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Amount::from_json(&json!("100")).drops(), Some(100));
        assert_eq!(Amount::from_json(&json!(100)).drops(), Some(100));

        let issued = Amount::from_json(&json!({
            "value": "1.5",
            "currency": "USD",
            "issuer": ISSUER,
        }));
        assert_eq!(issued, usd("1.5"));

        let numeric_value = Amount::from_json(&json!({
            "value": 2,
            "currency": "USD",
            "issuer": ISSUER,
        }));
        assert_eq!(numeric_value, usd("2"));

        assert!(!Amount::from_json(&json!({"value": "1", "currency": "USD"})).is_valid());
        assert!(!Amount::from_json(&json!({"currency": "USD", "issuer": ISSUER})).is_valid());
        assert!(!Amount::from_json(&json!(null)).is_valid());
        assert!(!Amount::from_json(&json!([1])).is_valid());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(amount("100").to_json(), json!("100"));
        assert_eq!(
            usd("1.5").to_json(),
            json!({"value": "1.5", "currency": "USD", "issuer": ISSUER})
        );
        assert_eq!(Amount::Invalid.to_json(), json!("0"));

        let legacy = amount(&format!("3/1/{ISSUER}"));
        assert_eq!(legacy.to_json()["currency"], json!(1));
    }

    #[test]
    fn test_from_human() {
        let options = HumanParseOptions::new();
        assert_eq!(Amount::from_human("0.1 STR", &options).drops(), Some(100_000));
        assert_eq!(Amount::from_human("0.1", &options).drops(), Some(100_000));
        assert_eq!(Amount::from_human("1.23456789", &options).drops(), Some(1_234_567));
        assert_eq!(Amount::from_human("-2 XRP", &options).drops(), Some(-2_000_000));

        let issued = Amount::from_human("12.5 USD", &options);
        assert_eq!(issued.to_text(), "12.5");
        assert_eq!(issued.currency().iso_code(), Some("USD"));
        assert_eq!(issued.issuer(), Some(UInt160::one()));

        let currency_first = Amount::from_human("USD 12.5", &options);
        assert!(currency_first.equals(&issued, false));

        assert!(!Amount::from_human("12345678901234567 USD", &options).is_valid());
        assert!(!Amount::from_human("1 U$D", &options).is_valid());
        assert!(!Amount::from_human("USD", &options).is_valid());
    }

    #[test]
    fn test_from_human_with_interest() {
        let time = LedgerTime::from_ledger_seconds(crate::domain::time::SECONDS_PER_YEAR);
        let options = HumanParseOptions::new().with_reference_time(time);
        let a = Amount::from_human("100 XAU (-0.5%pa)", &options);
        let value = a.to_decimal().unwrap();
        assert!(value > dec!(100.49) && value < dec!(100.51), "{value}");
    }

    #[test]
    fn test_native_add_sub() {
        assert_eq!(amount("-1").add(&amount("1")).unwrap().to_text(), "0");
        assert_eq!(amount("150").add(&amount("50")).unwrap().to_text_full(), "0.0002/STR");
        assert_eq!(amount("50").subtract(&amount("150")).unwrap().drops(), Some(-100));
        assert_eq!(
            Amount::from_drops(9_000_000_000_000_000_000).add(&amount("1")),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn test_issued_add_sub() {
        let sum = usd("150.02").add(&usd("50.5")).unwrap();
        assert_eq!(sum.to_text_full(), format!("200.52/USD/{ISSUER}"));

        let difference = usd("1").subtract(&usd("1.5")).unwrap();
        assert_eq!(difference.to_text(), "-0.5");
    }

    #[test]
    fn test_add_mismatch() {
        assert_eq!(
            amount("1").add(&usd("1")),
            Err(AmountError::InvalidOperation)
        );
        assert_eq!(
            usd("1").add(&amount("1/EUR/rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")),
            Err(AmountError::InvalidOperation)
        );
        assert_eq!(
            usd("1").add(&amount("1/USD")),
            Err(AmountError::InvalidOperation)
        );
        assert_eq!(
            Amount::Invalid.add(&Amount::Invalid),
            Err(AmountError::InvalidOperation)
        );
    }

    #[test]
    fn test_multiply() {
        assert_eq!(usd("2").multiply(&usd("3")).unwrap(), usd("6"));
        assert_eq!(usd("-2").multiply(&usd("3")).unwrap(), usd("-6"));
        assert_eq!(amount("1234567").multiply(&amount("7")).unwrap().drops(), Some(8_641_969));
        assert_eq!(usd("5").multiply(&amount("0")).unwrap(), usd("0"));

        let native_factor = usd("2").multiply(&amount("3")).unwrap();
        assert_eq!(native_factor, usd("6"));

        // 123456789 * 1000000007 = 123456789864197523 exactly
        let wide = amount("123456789").multiply(&amount("1000000007")).unwrap();
        assert_eq!(wide.drops(), Some(123_456_789_864_197_590));
        let back = wide.divide(&amount("1000000007")).unwrap();
        assert_eq!(back.drops(), Some(123_456_789));
    }

    #[test]
    fn test_divide() {
        assert_eq!(usd("1").divide(&usd("0")), Err(AmountError::DivideByZero));
        assert_eq!(usd("6").divide(&usd("3")).unwrap(), usd("2"));
        assert_eq!(usd("1").divide(&usd("3")).unwrap().to_text(), "0.3333333333333333");
        assert_eq!(amount("8641969").divide(&amount("7")).unwrap().drops(), Some(1_234_567));
        assert_eq!(usd("0").divide(&usd("3")).unwrap(), usd("0"));
        assert_eq!(
            Amount::Invalid.divide(&usd("0")),
            Err(AmountError::InvalidOperation)
        );
    }

    #[test]
    fn test_invert() {
        assert_eq!(usd("4").invert().unwrap(), usd("0.25"));
        assert_eq!(amount("2/STR").invert().unwrap().drops(), Some(500_000));
        assert_eq!(usd("0").invert(), Err(AmountError::DivideByZero));
        assert_eq!(Amount::Invalid.invert(), Err(AmountError::InvalidOperation));
    }

    #[test]
    fn test_product_ratio_human() {
        let options = ArithmeticOptions::new();
        let price = usd("0.5");
        let quantity = amount("10/STR");

        let total = price.product_human(&quantity, &options).unwrap();
        assert_eq!(total, usd("5"));

        let rate = usd("5").ratio_human(&quantity, &options).unwrap();
        assert_eq!(rate, usd("0.5"));

        assert_eq!(
            usd("5").ratio_human(&amount("0"), &options),
            Err(AmountError::DivideByZero)
        );
    }

    #[test]
    fn test_apply_interest() {
        let gold = Amount::issued(
            IssuedValue::parse("100").unwrap(),
            Currency::demurrage("XAU", -0.5),
            UInt160::parse_account(ISSUER),
        );
        let time = LedgerTime::from_ledger_seconds(crate::domain::time::SECONDS_PER_YEAR);
        let later = gold.apply_interest(time).unwrap();
        let value = later.to_decimal().unwrap();
        assert!(value > dec!(99.49) && value < dec!(99.51), "{value}");

        assert_eq!(usd("1").apply_interest(time).unwrap(), usd("1"));
        assert_eq!(amount("5").apply_interest(time).unwrap().drops(), Some(5));
    }

    #[test]
    fn test_negate_abs() {
        assert_eq!(usd("1.5").negate(), usd("-1.5"));
        assert_eq!(usd("-1.5").abs(), usd("1.5"));
        assert_eq!(amount("-7").abs().drops(), Some(7));
        assert!(!amount("0").negate().is_negative());
        assert!(!Amount::Invalid.negate().is_valid());
    }

    #[test]
    fn test_predicates() {
        assert!(amount("5").is_positive());
        assert!(!amount("0").is_positive());
        assert!(usd("-1").is_negative());
        assert!(usd("0").is_zero());
        assert!(!Amount::Invalid.is_zero());
        assert!(!Amount::Invalid.is_positive());
    }

    #[test]
    fn test_not_equals_why() {
        let other_issuer = "rrrrrrrrrrrrrrrrrrrrBZbvji";
        let cases = [
            (Amount::Invalid, amount("1"), "Invalid amount."),
            (amount("1"), usd("1"), "Native mismatch."),
            (amount("1"), amount("2"), "Native value differs."),
            (amount("1"), amount("-1"), "Native sign differs."),
            (usd("1"), usd("2"), "Non-native value differs."),
            (usd("1"), usd("-1"), "Non-native sign differs."),
            (
                usd("1"),
                amount(&format!("1/EUR/{ISSUER}")),
                "Non-native currency differs.",
            ),
        ];
        for (a, b, why) in cases {
            assert_eq!(a.not_equals_why(&b, false).as_deref(), Some(why));
        }

        let a = usd("1");
        let b = amount(&format!("1/USD/{other_issuer}"));
        let expected = format!("Non-native issuer differs: {ISSUER}/{other_issuer}");
        assert_eq!(a.not_equals_why(&b, false), Some(expected.clone()));
        assert_eq!(b.not_equals_why(&a, false), Some(expected));
        assert_eq!(a.not_equals_why(&b, true), None);
        assert!(a.equals(&b, true));
    }

    #[test]
    fn test_invalid_never_equal() {
        assert_ne!(Amount::Invalid, Amount::Invalid);
        assert_eq!(usd("1"), usd("1.0"));
        assert_eq!(amount("0"), amount("-0"));
    }

    #[test]
    fn test_compare() {
        assert_eq!(amount("1").compare(&amount("2")), Ok(Ordering::Less));
        assert_eq!(usd("-1").compare(&usd("-2")), Ok(Ordering::Greater));
        assert!(usd("1") < usd("1.5"));
        assert_eq!(
            usd("1").compare(&amount("1")),
            Err(AmountError::InvalidOperation)
        );
    }

    #[test]
    fn test_with_issuer_and_currency() {
        let moved = usd("1").with_issuer(UInt160::one());
        assert_eq!(moved.issuer(), Some(UInt160::one()));
        assert!(!usd("1").with_issuer(UInt160::invalid()).is_valid());
        assert_eq!(amount("5").with_issuer(UInt160::one()).drops(), Some(5));

        let euro = usd("1").with_currency(Currency::from_iso("EUR"));
        assert_eq!(euro.currency().iso_code(), Some("EUR"));
        assert!(!usd("1").with_currency(Currency::native()).is_valid());
        assert!(!amount("1").with_currency(Currency::from_iso("EUR")).is_valid());
    }

    #[test]
    fn test_decimal_conversion() {
        let a = Amount::from_decimal(dec!(12.3400), Currency::from_iso("USD"), UInt160::one());
        assert_eq!(a.to_text(), "12.34");
        assert_eq!(a.to_decimal(), Some(dec!(12.34)));

        let native = Amount::from_decimal(dec!(1.5), Currency::native(), UInt160::one());
        assert_eq!(native.drops(), Some(1_500_000));
        assert_eq!(native.to_decimal(), Some(dec!(1.500000)));

        assert_eq!(usd("1e-40").to_decimal(), Some(Decimal::ZERO));
        assert_eq!(usd("1e-60").to_decimal(), Some(Decimal::ZERO));
        assert_eq!(usd("-9.999999999999999e-81").to_decimal(), Some(Decimal::ZERO));
        assert_eq!(usd("1e40").to_decimal(), None);
        assert_eq!(Amount::Invalid.to_decimal(), None);
    }

    #[test]
    fn test_text_output() {
        assert_eq!(usd("1e20").to_text(), "1000000000000000e5");
        assert_eq!(usd("0.00001").to_text(), "0.00001");
        assert_eq!(usd("-123.45").to_text_full(), format!("-123.45/USD/{ISSUER}"));
        assert_eq!(amount("-1500000").to_text_full(), "-1.5/STR");
        assert_eq!(Amount::Invalid.to_text_full(), "0");
        assert_eq!(Amount::Invalid.to_string(), "0");
    }

    #[test]
    fn test_text_full_keeps_demurrage_bytes() {
        for currency in ["XAU (-0.537%pa)", "0158415500000100C1F76FF6ECB0BAC600000000"] {
            let original = amount(&format!("1/{currency}/{ISSUER}"));
            let text = original.to_text_full();
            assert_eq!(Amount::parse(&text).not_equals_why(&original, false), None, "{text}");
            assert_eq!(Amount::from_json(&original.to_json()), original);
        }

        let plain = amount(&format!("1/XAU (-0.5%pa)/{ISSUER}"));
        assert_eq!(plain.to_text_full(), format!("1/XAU (-0.5%pa)/{ISSUER}"));
    }

    #[test]
    fn test_to_human() {
        let display = HumanFormat::display();
        assert_eq!(amount("1234567891").to_human(&display), "1,234.567891");
        assert_eq!(usd("1234.5").to_human(&display), "1,234.50");
        assert_eq!(usd("0.1234565").to_human(&display), "0.123457");

        let full = amount("2500000").to_human_full(&HumanFormat::plain());
        assert_eq!(full, "2.5/STR");
    }
}
