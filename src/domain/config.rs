// ============================================================================
// Formatting and Decoding Options
// Option sets for human output, currency rendering and quality decoding
// ============================================================================

use crate::domain::currency::Currency;
use crate::domain::time::LedgerTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Human Format
// ============================================================================

/// Options for human-readable amount output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HumanFormat {
    /// Maximum fraction digits; excess digits are rounded half-up.
    /// None means print every significant digit
    pub precision: Option<usize>,

    /// Minimum fraction digits, padded with zeros
    pub min_precision: usize,

    /// Drop a fraction made only of zeros (after padding)
    pub skip_empty_fraction: bool,

    /// Thousands separator for the integer part
    pub group_separator: Option<char>,

    /// Digits per group when a separator is set
    pub group_width: usize,

    /// Print a leading minus sign for negative values
    pub signed: bool,
}

impl HumanFormat {
    /// Every significant digit, no grouping
    pub fn new() -> Self {
        Self {
            precision: None,
            min_precision: 0,
            skip_empty_fraction: false,
            group_separator: None,
            group_width: 3,
            signed: true,
        }
    }

    /// Builder method: Set maximum fraction digits
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Builder method: Set minimum fraction digits
    pub fn with_min_precision(mut self, min_precision: usize) -> Self {
        self.min_precision = min_precision;
        self
    }

    /// Builder method: Drop all-zero fractions
    pub fn with_skip_empty_fraction(mut self, skip: bool) -> Self {
        self.skip_empty_fraction = skip;
        self
    }

    /// Builder method: Group integer digits with a separator
    pub fn with_group_separator(mut self, separator: char) -> Self {
        self.group_separator = Some(separator);
        self
    }

    /// Builder method: Set digits per group
    pub fn with_group_width(mut self, width: usize) -> Self {
        self.group_width = width;
        self
    }

    /// Builder method: Suppress the minus sign
    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if self.group_width == 0 {
            return Err("Group width must be positive".to_string());
        }

        if let Some(precision) = self.precision {
            if self.min_precision > precision {
                return Err("Minimum precision cannot exceed precision".to_string());
            }
        }

        Ok(())
    }

    /// Plain output: every significant digit
    pub fn plain() -> Self {
        Self::new()
    }

    /// Display output for balances
    /// - Two to six fraction digits
    /// - Comma thousands separator
    pub fn display() -> Self {
        Self::new()
            .with_precision(6)
            .with_min_precision(2)
            .with_group_separator(',')
    }
}

impl Default for HumanFormat {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Currency Format
// ============================================================================

/// Options for currency rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrencyFormat {
    /// Full name appended as `CODE - name`
    pub full_name: Option<String>,

    /// Decimals of the printed interest rate; None means two
    pub decimals: Option<u32>,
}

impl CurrencyFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Append a full name
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Builder method: Set interest rate decimals
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err("Full name cannot be empty".to_string());
            }
        }

        if matches!(self.decimals, Some(d) if d > 15) {
            return Err("Interest decimals cannot exceed 15".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Parse and Arithmetic Options
// ============================================================================

/// Options for human amount parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HumanParseOptions {
    /// Convert an interest-bearing value back to its value at the
    /// currency's reference date
    pub reference_time: Option<LedgerTime>,
}

impl HumanParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the reference time
    pub fn with_reference_time(mut self, time: LedgerTime) -> Self {
        self.reference_time = Some(time);
        self
    }
}

/// Options for product/ratio operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArithmeticOptions {
    /// Apply the left operand's interest up to this time first
    pub reference_time: Option<LedgerTime>,
}

impl ArithmeticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the reference time
    pub fn with_reference_time(mut self, time: LedgerTime) -> Self {
        self.reference_time = Some(time);
        self
    }
}

// ============================================================================
// Quality Options
// ============================================================================

/// Options for decoding an order-book quality
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualityOptions {
    /// Currency of the base side; None means unknown
    pub base_currency: Option<Currency>,

    /// Return base per counter instead of counter per base
    pub inverse: bool,

    /// Keep a native base in drops instead of display units
    pub native_as_drops: bool,

    /// Remove the base currency's interest accrued up to this time
    pub reference_time: Option<LedgerTime>,
}

impl QualityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the base currency
    pub fn with_base_currency(mut self, currency: Currency) -> Self {
        self.base_currency = Some(currency);
        self
    }

    /// Builder method: Invert the rate
    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Builder method: Keep native base amounts in drops
    pub fn with_native_as_drops(mut self) -> Self {
        self.native_as_drops = true;
        self
    }

    /// Builder method: Set the reference time
    pub fn with_reference_time(mut self, time: LedgerTime) -> Self {
        self.reference_time = Some(time);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.base_currency, Some(c) if !c.is_valid()) {
            return Err("Base currency must be valid".to_string());
        }
        Ok(())
    }
}
