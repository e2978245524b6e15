//! Platform event normalization.
//!
//! Each platform module turns its payload into a [`CanonicalMessage`]. The
//! steps they share live here on [`Normalizer`]:
//!
//! 1. exclusion check (a skipped message produces nothing)
//! 2. author annotation: pronoun (non-blocking lookup) and platform tag
//! 3. body encoding with escaped text and media references
//! 4. announcement prefix
//! 5. color resolution against the platform's default background
//!
//! Platform differences are limited to media detection, default background
//! and badge source.

mod body;
mod trovo;
mod twitch;
mod youtube;

use std::sync::Arc;

use chat_overlay_config::OverlayConfig;
use chat_overlay_pronouns::{PronounLookup, PronounResolver};
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::color::{ColorModel, ColorRole, Rgb};
use crate::event::PlatformEvent;
use crate::filter::ExclusionFilter;
use crate::markup::escape_text;
use crate::message::{BodySegment, CanonicalMessage, HighlightKind, Platform};

/// Literal prefix rendered before an announcement body.
pub const ANNOUNCEMENT_PREFIX: &str = "📢 Announcement: ";

/// Reasons a platform payload cannot become a message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{0} message has no id")]
    MissingId(Platform),
    #[error("{platform} message {id} has no author id")]
    MissingAuthor { platform: Platform, id: String },
}

/// Non-blocking source of pronoun annotations.
///
/// Must answer immediately; a lookup still in flight is [`PronounLookup::Absent`].
pub trait PronounSource: Send + Sync {
    fn lookup(&self, author: &str) -> PronounLookup;
}

impl PronounSource for PronounResolver {
    fn lookup(&self, author: &str) -> PronounLookup {
        PronounResolver::lookup(self, author)
    }
}

/// Fields every platform supplies once its payload has been decoded.
pub(crate) struct Draft {
    pub platform: Platform,
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    /// Name used for pronoun lookup
    pub author_login: String,
    pub body: Vec<BodySegment>,
    /// Author color as sent by the platform
    pub author_color: Option<String>,
    /// Announcement color name, if the message is an announcement
    pub announcement: Option<String>,
    pub highlighted: bool,
    pub badges: Vec<String>,
}

/// Converts platform events into canonical messages.
pub struct Normalizer {
    config: Arc<OverlayConfig>,
    colors: ColorModel,
    filter: ExclusionFilter,
    pronouns: Option<Arc<dyn PronounSource>>,
}

impl Normalizer {
    pub fn new(
        config: Arc<OverlayConfig>,
        colors: ColorModel,
        pronouns: Option<Arc<dyn PronounSource>>,
    ) -> Self {
        let filter = ExclusionFilter::new(&config);
        Self {
            config,
            colors,
            filter,
            pronouns,
        }
    }

    /// Normalize `event` with the current local time as its timestamp.
    ///
    /// `Ok(None)` means the message was excluded.
    pub fn normalize(
        &self,
        event: &PlatformEvent,
    ) -> Result<Option<CanonicalMessage>, NormalizeError> {
        self.normalize_at(event, Local::now())
    }

    /// Normalize `event`, formatting the timestamp from `now`.
    pub fn normalize_at(
        &self,
        event: &PlatformEvent,
        now: DateTime<Local>,
    ) -> Result<Option<CanonicalMessage>, NormalizeError> {
        let draft = match event {
            PlatformEvent::Twitch { chat, announcement } => {
                twitch::draft(self, chat, announcement.as_deref())?
            }
            PlatformEvent::YouTube(e) => youtube::draft(self, e)?,
            PlatformEvent::Trovo(e) => trovo::draft(self, e)?,
        };
        Ok(draft.map(|draft| self.finish(draft, now)))
    }

    pub(crate) fn should_skip(&self, body: &str, author_name: &str) -> bool {
        let skip = self.filter.should_skip(body, author_name);
        if skip {
            log::debug!("Excluding message from {}", author_name);
        }
        skip
    }

    /// Pronoun and/or platform tag, joined with a space when both are present.
    fn annotation(&self, platform: Platform, author_login: &str) -> Option<String> {
        let pronoun = match (&self.pronouns, self.config.pronouns) {
            (Some(source), true) => match source.lookup(author_login) {
                PronounLookup::Present(display) => Some(display),
                PronounLookup::Absent => None,
            },
            _ => None,
        };
        let tag = self.config.platforms.then(|| platform.tag());

        match (pronoun, tag) {
            (Some(pronoun), Some(tag)) => Some(format!("{pronoun} {tag}")),
            (Some(pronoun), None) => Some(pronoun),
            (None, Some(tag)) => Some(tag.to_string()),
            (None, None) => None,
        }
    }

    fn highlight_kind(&self, highlighted: bool, announcement: bool) -> HighlightKind {
        if announcement && self.config.announcements {
            HighlightKind::Announcement
        } else if highlighted && self.config.highlights {
            HighlightKind::Highlight
        } else {
            HighlightKind::None
        }
    }

    /// Background and foreground for a message.
    fn resolve_colors(
        &self,
        platform: Platform,
        kind: HighlightKind,
        author_color: Option<&str>,
        announcement: Option<&str>,
    ) -> (Rgb, Rgb) {
        let announcement_background = match kind {
            HighlightKind::Announcement => {
                announcement.and_then(crate::color::announcement_color)
            }
            _ => None,
        };
        let explicit = match announcement_background {
            Some(rgb) => rgb.to_hex(),
            None => author_color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(platform.default_background())
                .to_string(),
        };
        let role = match kind {
            HighlightKind::None => ColorRole::Message,
            HighlightKind::Highlight => ColorRole::Highlight,
            HighlightKind::Announcement => ColorRole::Announcement,
        };

        let background = self.colors.resolve_background(Some(&explicit), role);
        let foreground = self
            .colors
            .foreground_for(background, kind == HighlightKind::None);
        (background, foreground)
    }

    fn finish(&self, draft: Draft, now: DateTime<Local>) -> CanonicalMessage {
        let kind = self.highlight_kind(draft.highlighted, draft.announcement.is_some());
        let (background, foreground) = self.resolve_colors(
            draft.platform,
            kind,
            draft.author_color.as_deref(),
            draft.announcement.as_deref(),
        );

        let mut body = draft.body;
        if kind == HighlightKind::Announcement {
            body.insert(0, BodySegment::text(escape_text(ANNOUNCEMENT_PREFIX)));
        }

        CanonicalMessage {
            annotation: self.annotation(draft.platform, &draft.author_login),
            timestamp: self
                .config
                .timestamp_format
                .as_deref()
                .and_then(|fmt| format_timestamp(now, fmt)),
            id: draft.id,
            platform: draft.platform,
            author_id: draft.author_id,
            author_name: draft.author_name,
            body,
            background,
            foreground,
            highlight: kind,
            badges: draft.badges,
        }
    }
}

/// Format `now` with a strftime pattern; an invalid pattern yields no timestamp.
fn format_timestamp(now: DateTime<Local>, pattern: &str) -> Option<String> {
    use std::fmt::Write;

    let mut out = String::new();
    match write!(out, "{}", now.format(pattern)) {
        Ok(()) => Some(out),
        Err(_) => {
            log::warn!("Invalid timestamp_format {:?}", pattern);
            None
        }
    }
}

/// Reject payloads without the identifiers the list relies on.
pub(crate) fn require_ids(
    platform: Platform,
    id: &str,
    author_id: &str,
) -> Result<(), NormalizeError> {
    if id.trim().is_empty() {
        return Err(NormalizeError::MissingId(platform));
    }
    if author_id.trim().is_empty() {
        return Err(NormalizeError::MissingAuthor {
            platform,
            id: id.to_string(),
        });
    }
    Ok(())
}
