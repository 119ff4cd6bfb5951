//! Shelf Notifier - Main Library
//!
//! Real-time notification listener for the shelf backend's push endpoint.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **config**: YAML configuration with environment overrides
//! - **logging**: tracing subscriber setup
//! - **app**: `NotifierApp`, the composition root owning the channel
//! - **push_channel**: WebSocket notification channel (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use shelf_notifier::bin_common::{resolve_config_path, parse_args};
//! use shelf_notifier::app::NotifierApp;
//! ```

// Re-export workspace libraries for convenience
pub use push_channel;

pub mod app;
pub mod config;
pub mod logging;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Config path resolution and the standard run loop shared by binaries.

    pub mod cli;
    pub mod runner;

    pub use cli::{
        load_config_from_env, parse_args, resolve_config_path, CONFIG_PATH_ENV,
        DEFAULT_CONFIG_PATH,
    };
    pub use runner::{BinaryRunner, RunConfig};
}
