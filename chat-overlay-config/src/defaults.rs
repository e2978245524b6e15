//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on an `OverlayConfig` field, so a partial YAML file picks up the
//! same values as `OverlayConfig::default()`.

use crate::types::{ColorOverrides, Direction};

// ── List bounds ────────────────────────────────────────────────────────────

pub fn max_messages() -> Option<usize> {
    None // Unbounded
}

pub fn fade_duration() -> Option<f64> {
    None // Messages never fade
}

pub fn direction() -> Direction {
    Direction::Vertical
}

// ── Message decoration ─────────────────────────────────────────────────────

pub fn pronouns() -> bool {
    false
}

pub fn platforms() -> bool {
    false
}

pub fn highlights() -> bool {
    true
}

pub fn announcements() -> bool {
    true
}

pub fn timestamp_format() -> Option<String> {
    None
}

// ── Exclusion ──────────────────────────────────────────────────────────────

pub fn cmdprefix() -> Option<String> {
    None
}

pub fn bots() -> Vec<String> {
    Vec::new()
}

// ── Colors ─────────────────────────────────────────────────────────────────

pub fn colors() -> ColorOverrides {
    ColorOverrides::default()
}

// ── Pruning ────────────────────────────────────────────────────────────────

pub fn prune_interval_secs() -> f64 {
    2.0
}

/// Delay before the first prune so the renderer has finished laying out
/// messages that arrived during startup.
pub fn prune_bootstrap_delay_secs() -> f64 {
    1.0
}

// ── Pronoun service ────────────────────────────────────────────────────────

pub fn pronoun_api_url() -> String {
    "https://pronouns.alejo.io/api".to_string()
}
