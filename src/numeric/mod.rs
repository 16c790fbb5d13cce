// ============================================================================
// Numeric Module
// Integer decimal arithmetic behind ledger amounts
// ============================================================================
//
// This module provides:
// - IssuedValue: canonical signed 16-digit mantissa/exponent decimal
// - Scaled: unnormalized intermediates for products, quotients and qualities
// - AmountError: error types for amount arithmetic
// - Wire limits shared by native and issued amounts
//
// Design principles:
// - No floating-point in value arithmetic (only interest multipliers are f64)
// - Truncation toward zero, never rounding, on normalization
// - All fallible arithmetic returns Result (no panics)

mod errors;
mod issued_value;
pub mod limits;
mod scaled;

pub use errors::{AmountError, AmountResult};
pub use issued_value::IssuedValue;
pub use scaled::Scaled;
