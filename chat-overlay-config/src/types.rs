//! Layout and color types referenced by [`crate::OverlayConfig`].

use serde::{Deserialize, Serialize};

/// Direction in which the message list grows.
///
/// Vertical lists expire entries that scroll past the top edge; horizontal
/// lists expire entries that scroll past the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Per-category color overrides.
///
/// Every entry is an optional hex string (`#RRGGBB` or `RRGGBB`). An override
/// that is set wins over any color carried by the message itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    /// Replaces the built-in fallback used when nothing else supplies a color
    pub default: Option<String>,
    /// Forces the text color of ordinary messages
    pub text: Option<String>,
    /// Page background behind the message list (`transparent` when unset)
    pub background: Option<String>,
    /// Bubble background of ordinary messages
    pub message: Option<String>,
    /// Bubble background of highlighted messages
    pub highlight: Option<String>,
    /// Bubble background of announcements
    pub announcement: Option<String>,
    /// Border drawn around every bubble
    pub bubble_border: Option<String>,
}

impl ColorOverrides {
    /// Iterate over `(name, value)` for every override that is set.
    pub fn iter_set(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("default", &self.default),
            ("text", &self.text),
            ("background", &self.background),
            ("message", &self.message),
            ("highlight", &self.highlight),
            ("announcement", &self.announcement),
            ("bubble_border", &self.bubble_border),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// Check whether `value` is a six-digit hex color, with or without a leading `#`.
pub fn is_hex_color(value: &str) -> bool {
    let digits = value.strip_prefix('#').unwrap_or(value);
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}
