//! Build information stamped in by `build.rs`

pub const BUILD_NUMBER: &str = env!("MACROTRACK_BUILD_NUMBER");
pub const BUILD_TIMESTAMP: &str = env!("MACROTRACK_BUILD_TIMESTAMP");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The build counter, or 0 if the build script wrote something unparsable
pub fn build_number() -> u64 {
    BUILD_NUMBER.parse().unwrap_or(0)
}

/// Print the startup banner to stderr (stdout belongs to the MCP transport)
pub fn print_startup_banner() {
    eprintln!("===============================================");
    eprintln!("  MacroTrack - calorie & macro tracker");
    eprintln!("  Version: {} | Build: {}", VERSION, build_number());
    eprintln!("  Compiled: {}", BUILD_TIMESTAMP);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_number_is_stamped() {
        assert!(build_number() > 0);
        assert_eq!(build_number().to_string(), BUILD_NUMBER);
    }
}
