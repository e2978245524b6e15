//! Typed error variants for the chat-overlay-config crate.
//!
//! Callers that only need a message can convert into `anyhow::Error`; callers
//! that want to react to a specific failure mode can match on [`ConfigError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_overlay_config::ConfigError;
//!
//! fn report(e: &ConfigError) {
//!     match e {
//!         ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!         ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!         ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the offending field and why it was rejected.
    #[error("Config validation error: {0}")]
    Validation(String),
}
