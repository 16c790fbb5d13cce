// ============================================================================
// Currency Codes
// 160-bit currency identifiers: native, ISO-style, demurrage and opaque codes
// ============================================================================

use crate::domain::config::CurrencyFormat;
use crate::domain::identifier::UInt160;
use crate::domain::time::{LedgerTime, SECONDS_PER_YEAR};
use arrayvec::ArrayString;
use serde_json::Value;
use std::fmt;

/// Canonical output token of the native currency
pub const NATIVE_TOKEN: &str = "STR";

/// Legacy native token, accepted on input only
pub const LEGACY_NATIVE_TOKEN: &str = "XRP";

/// Reserved code the ledger refuses as an issued currency ("XRP" in the
/// standard position). Produced when native text must be read as issued.
pub const HEX_CURRENCY_BAD: &str = "0000000000000000000000005852500000000000";

/// Type byte of an interest-bearing currency
const DEMURRAGE_TYPE: u8 = 0x01;

/// How the 20 raw bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    /// All zero bytes
    Native,
    /// Three-character code at bytes 12-14, everything else zero
    StandardIso,
    /// Type byte 0x01: code, reference date and e-fold period
    Demurrage,
    /// Any other valid bit pattern
    Opaque,
    /// Unparseable input
    Invalid,
}

/// A currency code.
///
/// Composes the raw 160-bit identifier with the fields derived from it.
/// Derivation happens once, in [`Currency::from_id`]; values are never
/// modified afterwards.
#[derive(Clone, Copy)]
pub struct Currency {
    raw: UInt160,
    kind: CurrencyKind,
    iso_code: Option<ArrayString<3>>,
    interest_start: u32,
    interest_period: f64,
}

impl Currency {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Derive all fields from raw bytes
    pub fn from_id(raw: UInt160) -> Self {
        let mut currency = Self {
            raw,
            kind: CurrencyKind::Invalid,
            iso_code: None,
            interest_start: 0,
            interest_period: f64::NAN,
        };

        let Some(bytes) = raw.as_bytes() else {
            return currency;
        };

        let standard = bytes[..12].iter().all(|&b| b == 0) && bytes[15..].iter().all(|&b| b == 0);
        if standard {
            if bytes[12..15].iter().all(|&b| b == 0) {
                currency.kind = CurrencyKind::Native;
                currency.iso_code = ArrayString::from(NATIVE_TOKEN).ok();
            } else {
                currency.kind = CurrencyKind::StandardIso;
                currency.iso_code = ascii_code(&bytes[12..15]);
            }
        } else if bytes[0] == DEMURRAGE_TYPE {
            currency.kind = CurrencyKind::Demurrage;
            currency.iso_code = ascii_code(&bytes[1..4]);
            currency.interest_start = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

            let mut period = [0u8; 8];
            period.copy_from_slice(&bytes[8..16]);
            currency.interest_period = f64::from_be_bytes(period);
        } else {
            currency.kind = CurrencyKind::Opaque;
        }

        currency
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self::from_id(UInt160::from_bytes(bytes))
    }

    /// Parse exactly 40 hex digits
    #[inline]
    pub fn from_hex(text: &str) -> Self {
        Self::from_id(UInt160::parse_hex(text))
    }

    #[inline]
    pub fn native() -> Self {
        Self::from_id(UInt160::zero())
    }

    pub fn invalid() -> Self {
        Self::from_id(UInt160::invalid())
    }

    /// A plain three-character code. Native tokens map to native.
    pub fn from_iso(code: &str) -> Self {
        match normalize_code(code) {
            Some(code) if is_native_token(&code) => Self::native(),
            Some(code) => Self::standard(&code),
            None => Self::invalid(),
        }
    }

    /// An interest-bearing code with an annual rate in percent; negative
    /// rates are demurrage.
    ///
    /// The rate is stored as the e-fold period
    /// `31536000 / ln(1 + rate / 100)` seconds. Rates at or below -100% are
    /// invalid.
    pub fn demurrage(code: &str, annual_rate: f64) -> Self {
        if !annual_rate.is_finite() || annual_rate <= -100.0 {
            return Self::invalid();
        }
        let Some(code) = normalize_code(code) else {
            return Self::invalid();
        };

        let period = SECONDS_PER_YEAR as f64 / (1.0 + annual_rate / 100.0).ln();

        let mut bytes = [0u8; 20];
        bytes[0] = DEMURRAGE_TYPE;
        bytes[1..4].copy_from_slice(code.as_bytes());
        // bytes 4-7 (reference date) and 16-19 (reserved) stay zero
        bytes[8..16].copy_from_slice(&period.to_be_bytes());
        Self::from_bytes(bytes)
    }

    fn standard(code: &str) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..15].copy_from_slice(code.as_bytes());
        Self::from_bytes(bytes)
    }

    fn native_or_bad(treat_native_as_issued: bool) -> Self {
        if treat_native_as_issued {
            Self::from_hex(HEX_CURRENCY_BAD)
        } else {
            Self::native()
        }
    }

    /// Parse any accepted text form, see [`Currency::parse_with`].
    #[inline]
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, false)
    }

    /// Parse currency text.
    ///
    /// Accepted forms, in order:
    /// - `""`, `"0"` and the native tokens: native (or [`HEX_CURRENCY_BAD`]
    ///   when `treat_native_as_issued`)
    /// - `"1"`: the legacy numeric code (the `one` identifier)
    /// - `CODE[ - FULL NAME][ (RATE%pa)]`, CODE being three ASCII
    ///   alphanumerics; the full name is discarded
    /// - 40 hex digits
    ///
    /// Anything else yields an invalid currency.
    pub fn parse_with(text: &str, treat_native_as_issued: bool) -> Self {
        let text = text.trim();
        if text.is_empty() || text == "0" {
            return Self::native_or_bad(treat_native_as_issued);
        }
        if text == "1" {
            tracing::debug!("Parsing legacy numeric currency code 1");
            return Self::from_id(UInt160::one());
        }

        if let Some(human) = HumanCurrency::parse(text) {
            let code = human.code.to_ascii_uppercase();
            if is_native_token(&code) {
                if code == LEGACY_NATIVE_TOKEN {
                    tracing::debug!("Accepting legacy native token {:?}", text);
                }
                return Self::native_or_bad(treat_native_as_issued);
            }
            return match human.rate {
                Some(rate) => Self::demurrage(&code, rate),
                None => Self::standard(&code),
            };
        }

        let currency = Self::from_hex(text);
        if !currency.is_valid() {
            tracing::trace!("Rejected currency text: {:?}", text);
        }
        currency
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn id(&self) -> UInt160 {
        self.raw
    }

    #[inline]
    pub fn kind(&self) -> CurrencyKind {
        self.kind
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.raw.is_valid()
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.kind == CurrencyKind::Native
    }

    /// Three-character code, when the bytes carry a readable one
    pub fn iso_code(&self) -> Option<&str> {
        self.iso_code.as_ref().map(|code| code.as_str())
    }

    /// Reference date of the interest, in ledger seconds
    #[inline]
    pub fn interest_start(&self) -> Option<LedgerTime> {
        (self.kind == CurrencyKind::Demurrage)
            .then(|| LedgerTime::from_ledger_seconds(self.interest_start as i64))
    }

    /// E-fold period of the interest in seconds
    #[inline]
    pub fn interest_period(&self) -> Option<f64> {
        (self.kind == CurrencyKind::Demurrage).then_some(self.interest_period)
    }

    pub fn has_interest(&self) -> bool {
        self.kind == CurrencyKind::Demurrage
            && !self.interest_period.is_nan()
            && self.interest_period != 0.0
    }

    #[inline]
    pub fn to_bytes(&self) -> Option<[u8; 20]> {
        self.raw.to_bytes()
    }

    #[inline]
    pub fn to_hex(&self) -> Option<String> {
        self.raw.to_hex()
    }

    /// Byte-wise equality; invalid currencies are never equal.
    #[inline]
    pub fn equals(&self, other: &Self) -> bool {
        self.raw.equals(&other.raw)
    }

    fn is_hex_one(&self) -> bool {
        self.raw.equals(&UInt160::one())
    }

    // ========================================================================
    // Interest
    // ========================================================================

    /// One 365-day year after the interest reference date
    pub fn one_year_after_start(&self) -> LedgerTime {
        LedgerTime::from_ledger_seconds(self.interest_start as i64 + SECONDS_PER_YEAR)
    }

    /// Value multiplier at `time`: `exp((time - start) / period)`.
    /// 1.0 for currencies without interest.
    pub fn interest_at(&self, time: LedgerTime) -> f64 {
        if !self.has_interest() {
            return 1.0;
        }
        let elapsed = (time.as_ledger_seconds() - self.interest_start as i64) as f64;
        (elapsed / self.interest_period).exp()
    }

    /// Accrued interest at `time` in percent, rounded half-up to
    /// `decimals` places (two by default).
    pub fn interest_percentage_at(&self, time: LedgerTime, decimals: Option<u32>) -> f64 {
        let percentage = self.interest_at(time) * 100.0 - 100.0;
        let multiplier = 10f64.powi(decimals.unwrap_or(2) as i32);
        let rounded = (percentage * multiplier + 0.5).floor() / multiplier;
        // no negative zero
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// JSON form: a string, except the legacy numeric code which is the
    /// number `1`. Invalid currencies render as the native token.
    pub fn to_json(&self, format: &CurrencyFormat) -> Value {
        if self.is_valid() && self.is_hex_one() {
            tracing::debug!("Rendering legacy numeric currency code as 1");
            return Value::from(1);
        }
        Value::String(self.to_human(format))
    }

    /// Lossless text: the default human form when it parses back to the
    /// same bytes, otherwise 40 hex digits.
    ///
    /// A rate that needs more than two decimals, a nonzero reference date
    /// or a lower-case code all fall back to hex.
    pub fn to_text(&self) -> String {
        let human = self.to_human(&CurrencyFormat::default());
        if !self.is_valid() || Self::parse(&human).equals(self) {
            return human;
        }
        tracing::trace!("Currency {:?} does not survive its human form", human);
        self.to_hex().unwrap_or(human)
    }

    /// Lossless JSON: [`Currency::to_text`] as a string, the legacy
    /// numeric code as the number `1`.
    pub fn to_exact_json(&self) -> Value {
        if self.is_valid() && self.is_hex_one() {
            return Value::from(1);
        }
        Value::String(self.to_text())
    }

    /// Human form: `CODE[ - name]`, `CODE[ - name] (RATE%pa)` for
    /// interest-bearing codes, otherwise 40 hex digits.
    pub fn to_human(&self, format: &CurrencyFormat) -> String {
        let full_name = format
            .full_name
            .as_deref()
            .map(|name| format!(" - {name}"))
            .unwrap_or_default();

        let printable = self.iso_code().filter(|code| is_printable_code(code));
        match (self.kind, printable) {
            (CurrencyKind::Invalid, _) => {
                tracing::debug!("Rendering invalid currency as the native token");
                NATIVE_TOKEN.to_string()
            },
            (CurrencyKind::Native, _) => format!("{NATIVE_TOKEN}{full_name}"),
            (CurrencyKind::StandardIso, Some(code)) => format!("{code}{full_name}"),
            (CurrencyKind::Demurrage, Some(code)) if self.has_interest() => {
                let rate =
                    self.interest_percentage_at(self.one_year_after_start(), format.decimals);
                format!("{code}{full_name} ({}%pa)", rate)
            },
            _ if self.is_hex_one() => "1".to_string(),
            _ => self.to_hex().unwrap_or_else(|| NATIVE_TOKEN.to_string()),
        }
    }
}

// ============================================================================
// Human Grammar
// ============================================================================

/// `CODE[ - FULL NAME][ (RATE%pa)]`
struct HumanCurrency<'a> {
    code: &'a str,
    rate: Option<f64>,
}

impl<'a> HumanCurrency<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let code = text.get(..3)?;
        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }

        let mut rest = text[3..].trim_start();
        if let Some(after_dash) = rest.strip_prefix('-') {
            let end = after_dash.find('(').unwrap_or(after_dash.len());
            let name = after_dash[..end].trim();
            let name_ok = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ');
            if !name_ok {
                return None;
            }
            rest = after_dash[end..].trim_start();
        }

        let mut rate = None;
        if let Some(inner) = rest.strip_prefix('(') {
            let number = inner.strip_suffix(')')?.trim().strip_suffix("%pa")?.trim();
            rate = Some(parse_rate(number)?);
            rest = "";
        }

        rest.is_empty().then_some(Self { code, rate })
    }
}

/// `[+-]digits[.digits]`
fn parse_rate(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int_digits, frac_digits) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let well_formed = !int_digits.is_empty()
        && int_digits.bytes().all(|b| b.is_ascii_digit())
        && frac_digits.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return None;
    }
    text.parse().ok()
}

fn ascii_code(bytes: &[u8]) -> Option<ArrayString<3>> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|code| ArrayString::from(code).ok())
}

fn normalize_code(code: &str) -> Option<String> {
    let code = code.trim();
    (code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphanumeric()))
        .then(|| code.to_ascii_uppercase())
}

fn is_native_token(code: &str) -> bool {
    code == NATIVE_TOKEN || code == LEGACY_NATIVE_TOKEN
}

/// `[A-Z0-9]{3}`
fn is_printable_code(code: &str) -> bool {
    code.len() == 3
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Currency {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::native()
    }
}

impl From<UInt160> for Currency {
    fn from(raw: UInt160) -> Self {
        Self::from_id(raw)
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({:?}, {})", self.kind, self)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human(&CurrencyFormat::default()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Currency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_exact_json(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Currency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        Ok(match value {
            Value::String(text) => Self::parse(&text),
            Value::Number(number) => Self::parse(&number.to_string()),
            _ => Self::invalid(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
