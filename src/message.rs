//! Canonical, platform-agnostic message model.
//!
//! Every platform normalizer produces a [`CanonicalMessage`]. Once built, a
//! message is never mutated: colors, body and annotations are fixed at
//! normalization time and the list only stores and removes it.

use serde::Serialize;

use crate::color::Rgb;

/// Chat platform a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitch,
    #[serde(rename = "youtube")]
    YouTube,
    Trovo,
}

impl Platform {
    /// Tag appended to the author annotation when platform display is on.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Twitch => "(Twitch)",
            Platform::YouTube => "(YouTube)",
            Platform::Trovo => "(Trovo)",
        }
    }

    /// Bubble background used when the author supplies no color.
    pub fn default_background(&self) -> &'static str {
        match self {
            Platform::Twitch => "#9147ff",
            Platform::YouTube => "#ff0000",
            Platform::Trovo => "#1bc878",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Platform::Twitch => "Twitch",
            Platform::YouTube => "YouTube",
            Platform::Trovo => "Trovo",
        })
    }
}

/// Styling class of a message. Announcement outranks highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    #[default]
    None,
    Highlight,
    Announcement,
}

/// One run of a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodySegment {
    /// Literal text, already escaped for markup embedding.
    Text { text: String },
    /// Inline media (emote, sticker) referenced by URL only.
    ///
    /// `alt` is the replaced source text, escaped like a text run.
    Media { url: String, alt: String },
}

impl BodySegment {
    pub fn text(text: impl Into<String>) -> Self {
        BodySegment::Text { text: text.into() }
    }

    pub fn media(url: impl Into<String>, alt: impl Into<String>) -> Self {
        BodySegment::Media {
            url: url.into(),
            alt: alt.into(),
        }
    }
}

/// The unit the list stores and the renderer paints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalMessage {
    /// Platform-provided id, unique among visible messages
    pub id: String,
    pub platform: Platform,
    /// Identifier used for bulk removal on timeout/ban
    pub author_id: String,
    pub author_name: String,
    pub body: Vec<BodySegment>,
    pub background: Rgb,
    pub foreground: Rgb,
    pub highlight: HighlightKind,
    /// Badge image URLs, in display order
    pub badges: Vec<String>,
    /// Pronoun and/or platform tag shown next to the author name
    pub annotation: Option<String>,
    pub timestamp: Option<String>,
}

impl CanonicalMessage {
    /// Concatenated body as markup: escaped text runs and `<img>` tags for media.
    pub fn body_markup(&self) -> String {
        self.body
            .iter()
            .map(|segment| match segment {
                BodySegment::Text { text } => text.clone(),
                BodySegment::Media { url, alt } => format!(
                    "<img class=\"emote\" src=\"{}\" alt=\"{}\">",
                    crate::markup::escape_text(url),
                    alt
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_tags() {
        assert_eq!(Platform::Twitch.tag(), "(Twitch)");
        assert_eq!(Platform::YouTube.tag(), "(YouTube)");
        assert_eq!(Platform::Trovo.tag(), "(Trovo)");
    }

    #[test]
    fn test_body_markup_escapes_media_attributes() {
        let msg = CanonicalMessage {
            id: "1".to_string(),
            platform: Platform::Twitch,
            author_id: "a".to_string(),
            author_name: "A".to_string(),
            body: vec![
                BodySegment::text("hi "),
                BodySegment::media("https://cdn/e?a=1&b=2", "&#34;:)"),
            ],
            background: Rgb::BLACK,
            foreground: Rgb::WHITE,
            highlight: HighlightKind::None,
            badges: Vec::new(),
            annotation: None,
            timestamp: None,
        };
        assert_eq!(
            msg.body_markup(),
            "hi <img class=\"emote\" src=\"https://cdn/e?a=1&#38;b=2\" alt=\"&#34;:)\">"
        );
    }

    #[test]
    fn test_body_segment_serializes_tagged() {
        let json = serde_json::to_string(&BodySegment::text("x")).unwrap();
        assert_eq!(json, r#"{"kind":"text","text":"x"}"#);
    }
}
