//! Core `OverlayConfig` struct, persistence and validation.
//!
//! The config is read once at startup, validated, and then shared as an
//! immutable value (`Arc<OverlayConfig>`) with every component that needs it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ColorOverrides, Direction, is_hex_color};

/// File name of the YAML config inside the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Shortest accepted fade duration or prune interval.
pub const MIN_DURATION: Duration = Duration::from_millis(1);

/// Longest accepted duration setting (one week).
pub const MAX_DURATION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    // ========================================================================
    // List bounds
    // ========================================================================
    /// Maximum number of visible messages (unset or 0 = unbounded)
    #[serde(default = "crate::defaults::max_messages")]
    pub max_messages: Option<usize>,

    /// Seconds after insertion at which a message has fully faded out (unset = never)
    #[serde(default = "crate::defaults::fade_duration")]
    pub fade_duration: Option<f64>,

    /// Direction in which the list grows
    #[serde(default = "crate::defaults::direction")]
    pub direction: Direction,

    // ========================================================================
    // Message decoration
    // ========================================================================
    /// Show author pronouns next to the name
    #[serde(default = "crate::defaults::pronouns")]
    pub pronouns: bool,

    /// Append the source platform, e.g. "(Twitch)", next to the name
    #[serde(default = "crate::defaults::platforms")]
    pub platforms: bool,

    /// Style highlighted messages distinctly
    #[serde(default = "crate::defaults::highlights")]
    pub highlights: bool,

    /// Style announcements distinctly and prefix their body
    #[serde(default = "crate::defaults::announcements")]
    pub announcements: bool,

    /// chrono strftime pattern for the per-message timestamp (unset = no timestamp)
    #[serde(default = "crate::defaults::timestamp_format")]
    pub timestamp_format: Option<String>,

    // ========================================================================
    // Exclusion
    // ========================================================================
    /// Messages starting with this prefix are never shown
    #[serde(default = "crate::defaults::cmdprefix")]
    pub cmdprefix: Option<String>,

    /// Author names (case-insensitive) whose messages are never shown
    #[serde(default = "crate::defaults::bots")]
    pub bots: Vec<String>,

    // ========================================================================
    // Colors
    // ========================================================================
    #[serde(default = "crate::defaults::colors")]
    pub colors: ColorOverrides,

    // ========================================================================
    // Pruning
    // ========================================================================
    /// Seconds between prune sweeps
    #[serde(default = "crate::defaults::prune_interval_secs")]
    pub prune_interval_secs: f64,

    /// Seconds before the first prune sweep
    #[serde(default = "crate::defaults::prune_bootstrap_delay_secs")]
    pub prune_bootstrap_delay_secs: f64,

    // ========================================================================
    // Pronoun service
    // ========================================================================
    /// Base URL of the pronoun lookup API
    #[serde(default = "crate::defaults::pronoun_api_url")]
    pub pronoun_api_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_messages: crate::defaults::max_messages(),
            fade_duration: crate::defaults::fade_duration(),
            direction: crate::defaults::direction(),
            pronouns: crate::defaults::pronouns(),
            platforms: crate::defaults::platforms(),
            highlights: crate::defaults::highlights(),
            announcements: crate::defaults::announcements(),
            timestamp_format: crate::defaults::timestamp_format(),
            cmdprefix: crate::defaults::cmdprefix(),
            bots: crate::defaults::bots(),
            colors: crate::defaults::colors(),
            prune_interval_secs: crate::defaults::prune_interval_secs(),
            prune_bootstrap_delay_secs: crate::defaults::prune_bootstrap_delay_secs(),
            pronoun_api_url: crate::defaults::pronoun_api_url(),
        }
    }
}

impl OverlayConfig {
    /// Directory holding the overlay config (`<config dir>/chat-overlay`).
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chat-overlay")
    }

    /// Default location of the YAML config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Parse, normalize and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: OverlayConfig = if contents.trim().is_empty() {
            OverlayConfig::default()
        } else {
            serde_yaml_ng::from_str(contents)?
        };
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load the config from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load the config from `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Serialize the config as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Write the config to `path` as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Canonicalize values that have more than one spelling.
    ///
    /// - `max_messages: 0` becomes unbounded
    /// - bot names are trimmed and lowercased, empty entries dropped
    /// - empty color overrides are treated as unset
    pub fn normalize(&mut self) {
        if self.max_messages == Some(0) {
            self.max_messages = None;
        }

        self.bots = self
            .bots
            .iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        for slot in [
            &mut self.colors.default,
            &mut self.colors.text,
            &mut self.colors.background,
            &mut self.colors.message,
            &mut self.colors.highlight,
            &mut self.colors.announcement,
            &mut self.colors.bubble_border,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
    }

    /// Check field values for semantic errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fade) = self.fade_duration {
            check_secs("fade_duration", fade, MIN_DURATION)?;
        }
        check_secs("prune_interval_secs", self.prune_interval_secs, MIN_DURATION)?;
        check_secs(
            "prune_bootstrap_delay_secs",
            self.prune_bootstrap_delay_secs,
            Duration::ZERO,
        )?;

        if self.cmdprefix.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "cmdprefix must not be empty; leave it unset to disable command filtering"
                    .to_string(),
            ));
        }

        for (name, value) in self.colors.iter_set() {
            let transparent_background = name == "background" && value == "transparent";
            if !transparent_background && !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "colors.{name} must be a hex color like #RRGGBB, got {value:?}"
                )));
            }
        }

        Ok(())
    }

    /// Lowercased bot names as a set for O(1) membership checks.
    pub fn bot_set(&self) -> HashSet<String> {
        self.bots.iter().map(|b| b.to_lowercase()).collect()
    }

    /// Fade duration as a `Duration`, if configured and representable.
    pub fn fade(&self) -> Option<Duration> {
        self.fade_duration
            .and_then(to_duration)
            .filter(|d| *d >= MIN_DURATION)
    }

    /// Interval between prune sweeps.
    ///
    /// Falls back to the default when the field holds an out-of-range value.
    pub fn prune_interval(&self) -> Duration {
        to_duration(self.prune_interval_secs)
            .filter(|d| *d >= MIN_DURATION)
            .unwrap_or_else(|| Duration::from_secs_f64(crate::defaults::prune_interval_secs()))
    }

    /// Delay before the first prune sweep.
    pub fn prune_bootstrap_delay(&self) -> Duration {
        to_duration(self.prune_bootstrap_delay_secs).unwrap_or_else(|| {
            Duration::from_secs_f64(crate::defaults::prune_bootstrap_delay_secs())
        })
    }
}

/// Seconds to a `Duration`, or `None` if negative, non-finite or above [`MAX_DURATION`].
fn to_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| *d <= MAX_DURATION)
}

/// Reject a seconds value outside `min..=MAX_DURATION`.
fn check_secs(name: &str, secs: f64, min: Duration) -> Result<(), ConfigError> {
    match to_duration(secs) {
        Some(d) if d >= min => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{name} must be between {} and {} seconds, got {secs}",
            min.as_secs_f64(),
            MAX_DURATION.as_secs()
        ))),
    }
}
