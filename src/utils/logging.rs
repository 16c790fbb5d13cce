// ============================================================================
// Logging
// Subscriber setup for the crate's tracing events
// ============================================================================

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"ledger_amount=debug"`).
///
/// # Errors
/// Returns an error if the directive is malformed or a global subscriber
/// is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), String> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| e.to_string())?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging("ledger_amount=trace");
        assert!(init_logging("ledger_amount=trace").is_err());
    }
}
