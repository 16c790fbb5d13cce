// ============================================================================
// Amount Errors
// Errors raised by amount arithmetic
// ============================================================================

use std::fmt;

/// Errors raised by arithmetic on ledger amounts.
///
/// Malformed external input never produces one of these: it yields an
/// invalid value instead. An `AmountError` means the caller combined values
/// that cannot be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountError {
    /// Operands have different denominations (native vs issued, or a
    /// different currency/issuer), or one of them is invalid
    InvalidOperation,
    /// Divisor is zero
    DivideByZero,
    /// Result exceeds the range the wire format can carry
    Overflow,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::InvalidOperation => write!(
                f,
                "invalid operation: operands are invalid or not comparable"
            ),
            AmountError::DivideByZero => write!(f, "division by zero"),
            AmountError::Overflow => {
                write!(f, "amount overflow: result exceeds the wire format range")
            },
        }
    }
}

impl std::error::Error for AmountError {}

/// Result type alias for amount operations
pub type AmountResult<T> = Result<T, AmountError>;
