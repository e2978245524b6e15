//! Configuration system for the chat-overlay message renderer.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for the overlay. It includes:
//!
//! - The [`OverlayConfig`] value constructed once at startup and shared by
//!   reference with every component
//! - Layout and color override types
//! - Typed [`ConfigError`] variants for I/O, parse and validation failures

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::{MAX_DURATION, MIN_DURATION, OverlayConfig};
pub use error::ConfigError;
pub use types::{ColorOverrides, Direction, is_hex_color};
