//! Logger setup shared by the binaries.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` if set and non-empty, otherwise `DEFAULT_LOG_FILTER`.
pub fn log_filter(env_value: Option<String>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Initializes `pretty_env_logger` with `log_filter(RUST_LOG)`.
pub fn init_logger() {
    let filter = log_filter(std::env::var("RUST_LOG").ok());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filter)
        .try_init()
        .ok(); // already set (e.g., in tests)
}
