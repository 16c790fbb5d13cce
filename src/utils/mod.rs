// ============================================================================
// Utilities Module
// Process-level helpers for embedding applications
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;
