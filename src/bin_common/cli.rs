//! CLI utilities for binaries
//!
//! Handles configuration path resolution from arguments and environment
//! variables.

use std::path::PathBuf;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "NOTIFIER_CONFIG_PATH";

/// Config file used when neither an argument nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "config/notifier.yaml";

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use shelf_notifier::bin_common::load_config_from_env;
///
/// let path = load_config_from_env();
/// ```
pub fn load_config_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

/// Resolve the config path: first CLI argument, then environment, then default
pub fn resolve_config_path(args: &[String]) -> PathBuf {
    match args.first() {
        Some(path) => PathBuf::from(path),
        None => load_config_from_env(),
    }
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
