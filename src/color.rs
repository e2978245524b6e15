//! Color model for message bubbles.
//!
//! Normalizes loosely formatted color input into [`Rgb`], picks a readable
//! foreground for a background, and decides where a bubble background comes
//! from: a configured override, the message's own color, or the default.
//! Nothing here fails into the render path; malformed input falls back to the
//! configured default.

use std::fmt;

use chat_overlay_config::OverlayConfig;
use serde::{Serialize, Serializer};

/// Built-in fallback when the config has no `default` override.
const FALLBACK_DEFAULT: Rgb = Rgb::new(0, 0, 0);

/// Brightness threshold (scaled by 1000) below which text is drawn white.
const BRIGHTNESS_THRESHOLD_MILLI: u32 = 125_000;

/// A color in RGB format.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a six-digit hex string with or without a leading `#`.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        Self::from_channels(&digits[0..2], &digits[2..4], &digits[4..6])
    }

    /// Build a color from three two-character hex channels, e.g. `("FF", "99", "00")`.
    pub fn from_channels(r: &str, g: &str, b: &str) -> Option<Self> {
        let channel = |s: &str| {
            if s.len() == 2 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
                u8::from_str_radix(s, 16).ok()
            } else {
                None
            }
        };
        Some(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    /// Perceptual brightness `0.299R + 0.587G + 0.114B`, scaled by 1000 to stay in integers.
    pub fn brightness_milli(&self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A paintable value: either a concrete color or fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Transparent,
    Color(Rgb),
}

/// Which configured override applies to a bubble background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Message,
    Highlight,
    Announcement,
}

/// Background for a named announcement color.
///
/// `primary` and unknown names return `None`, meaning the author's own color applies.
pub fn announcement_color(name: &str) -> Option<Rgb> {
    match name.trim().to_ascii_lowercase().as_str() {
        "blue" => Some(Rgb::new(0x00, 0x99, 0xff)),
        "green" => Some(Rgb::new(0x00, 0xff, 0x00)),
        "orange" => Some(Rgb::new(0xff, 0x99, 0x00)),
        "purple" => Some(Rgb::new(0x99, 0x00, 0xff)),
        _ => None,
    }
}

/// Color rules resolved once from the config.
#[derive(Debug, Clone)]
pub struct ColorModel {
    default: Rgb,
    text: Option<Rgb>,
    message: Option<Rgb>,
    highlight: Option<Rgb>,
    announcement: Option<Rgb>,
    page_background: Paint,
    bubble_border: Option<Rgb>,
}

impl ColorModel {
    pub fn new(config: &OverlayConfig) -> Self {
        let colors = &config.colors;
        let parse = |value: &Option<String>| value.as_deref().and_then(Rgb::parse_hex);

        let default = parse(&colors.default).unwrap_or(FALLBACK_DEFAULT);
        let page_background = match colors.background.as_deref() {
            None | Some("transparent") => Paint::Transparent,
            Some(hex) => Paint::Color(Rgb::parse_hex(hex).unwrap_or(default)),
        };

        Self {
            default,
            text: parse(&colors.text),
            message: parse(&colors.message),
            highlight: parse(&colors.highlight),
            announcement: parse(&colors.announcement),
            page_background,
            bubble_border: parse(&colors.bubble_border),
        }
    }

    /// The configured default color.
    pub fn default_color(&self) -> Rgb {
        self.default
    }

    /// Normalize arbitrary input; `None` or malformed input yields the default.
    pub fn normalize(&self, input: Option<&str>) -> Rgb {
        match input {
            None => self.default,
            Some(raw) => Rgb::parse_hex(raw).unwrap_or_else(|| {
                log::debug!("Malformed color {:?}, using default", raw);
                self.default
            }),
        }
    }

    /// Readable text color for `background`.
    ///
    /// A configured text override wins when `allow_config_override` is set.
    /// Otherwise the result is white below brightness 125 and black from 125 up.
    pub fn foreground_for(&self, background: Rgb, allow_config_override: bool) -> Rgb {
        if allow_config_override && let Some(text) = self.text {
            return text;
        }
        if background.brightness_milli() < BRIGHTNESS_THRESHOLD_MILLI {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }

    /// Bubble background: override for `role` > `explicit` > default.
    pub fn resolve_background(&self, explicit: Option<&str>, role: ColorRole) -> Rgb {
        let role_override = match role {
            ColorRole::Message => self.message,
            ColorRole::Highlight => self.highlight,
            ColorRole::Announcement => self.announcement,
        };
        match (role_override, explicit) {
            (Some(color), _) => color,
            (None, Some(raw)) => self.normalize(Some(raw)),
            (None, None) => self.default,
        }
    }

    /// Hex form of a paint value; `None` resolves to the default color.
    pub fn to_hex(&self, value: Option<Paint>) -> String {
        match value {
            Some(Paint::Transparent) => "transparent".to_string(),
            Some(Paint::Color(rgb)) => rgb.to_hex(),
            None => self.default.to_hex(),
        }
    }

    /// Page-level colors for the renderer.
    pub fn theme(&self) -> OverlayTheme {
        OverlayTheme {
            background: self.to_hex(Some(self.page_background)),
            bubble_border: self.bubble_border.map(|c| c.to_hex()),
        }
    }
}

/// Page-level colors that do not belong to any single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayTheme {
    pub background: String,
    pub bubble_border: Option<String>,
}
