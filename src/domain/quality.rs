// ============================================================================
// Quality Decoding
// Exchange rates packed into the tail of order-book directory keys
// ============================================================================

use crate::domain::amount::Amount;
use crate::domain::config::QualityOptions;
use crate::domain::currency::Currency;
use crate::domain::identifier::UInt160;
use crate::numeric::limits::NATIVE_PRECISION;
use crate::numeric::Scaled;

/// Hex digits of the packed rate at the end of a directory key
const QUALITY_HEX_LEN: usize = 16;

/// Low 56 bits hold the mantissa
const MANTISSA_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// The top byte holds `exponent + 100`
const EXPONENT_BIAS: i64 = 100;

impl Amount {
    /// Decode the rate packed in an order-book quality; `options.inverse`
    /// returns its reciprocal.
    ///
    /// Only the last 16 hex digits of `quality` are read, so a full 256-bit
    /// directory key can be passed as is. The result is denominated in
    /// `counter_currency`; a native counter yields drops. A native base is
    /// rescaled to display units before any inversion unless
    /// `options.native_as_drops` is set.
    pub fn from_quality(
        quality: &str,
        counter_currency: Currency,
        counter_issuer: UInt160,
        options: &QualityOptions,
    ) -> Self {
        match decode_quality(quality.trim(), counter_currency, counter_issuer, options) {
            Some(rate) => rate,
            None => {
                tracing::trace!("Rejected quality: {:?}", quality);
                Self::Invalid
            },
        }
    }
}

fn decode_quality(
    quality: &str,
    counter_currency: Currency,
    counter_issuer: UInt160,
    options: &QualityOptions,
) -> Option<Amount> {
    if quality.len() < QUALITY_HEX_LEN || !quality.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let word = u64::from_str_radix(&quality[quality.len() - QUALITY_HEX_LEN..], 16).ok()?;

    let mantissa = word & MANTISSA_MASK;
    let mut offset = (word >> 56) as i64 - EXPONENT_BIAS;

    let base = options.base_currency.filter(Currency::is_valid);
    if !options.native_as_drops && base.is_some_and(|c| c.is_native()) {
        let shift = NATIVE_PRECISION as i64;
        offset += if options.inverse { -shift } else { shift };
    }

    let mut magnitude = Scaled::new(mantissa as u128, offset);
    if options.inverse {
        magnitude = magnitude.invert().ok()?;
    }

    let template = Amount::zero_in(counter_currency, counter_issuer);
    let mut rate = template.rebuild(magnitude, false).ok()?;

    if let (Some(time), Some(base)) = (options.reference_time, base) {
        rate = rate.remove_interest(&base, time).ok()?;
    }
    Some(rate)
}
