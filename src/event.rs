//! JSON protocol for events arriving from the chat transport.
//!
//! The transport delivers one JSON object per line, tagged with `event` so the
//! overlay can dispatch on it:
//!
//! ```json
//! {"event":"twitch_chat_message","id":"m1","user_id":"42","user_name":"someone","message":"hi"}
//! {"event":"user_banned","author_id":"42"}
//! ```
//!
//! [`InboundEvent::route`] splits the wire enum into platform chat events,
//! which go through exclusion and normalization, and moderation events, which
//! go straight to targeted removal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding a single inbound line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty event line")]
    Empty,
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
}

/// A Twitch emote as an inclusive code-point range into the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchEmote {
    /// Twitch emote id, used to build the CDN URL when `url` is absent
    #[serde(default)]
    pub id: Option<String>,
    /// Explicit image URL (third-party emotes)
    #[serde(default)]
    pub url: Option<String>,
    /// Index of the first code point covered by the emote
    pub start: usize,
    /// Index of the last code point covered by the emote (inclusive)
    pub end: usize,
}

/// A token replaced by an image wherever it occurs, e.g. `:yt:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEmote {
    pub token: String,
    pub url: String,
}

/// Twitch chat message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchChatEvent {
    pub id: String,
    pub user_id: String,
    /// Login name (lowercase), used for exclusion and pronoun lookup
    pub user_name: String,
    /// Display name with the author's capitalization
    #[serde(default)]
    pub display_name: Option<String>,
    /// Author chat color as hex
    #[serde(default)]
    pub color: Option<String>,
    pub message: String,
    #[serde(default)]
    pub emotes: Vec<TwitchEmote>,
    /// Badge image URLs
    #[serde(default)]
    pub badges: Vec<String>,
    /// Channel-point "highlight my message" redemption
    #[serde(default)]
    pub highlighted: bool,
}

/// Twitch announcement payload: a chat message plus its announcement color name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchAnnouncementEvent {
    #[serde(flatten)]
    pub chat: TwitchChatEvent,
    /// `blue`, `green`, `orange`, `purple` or `primary`
    #[serde(default)]
    pub color_name: Option<String>,
}

/// YouTube live chat message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YouTubeChatEvent {
    pub id: String,
    pub channel_id: String,
    pub author_name: String,
    pub message: String,
    #[serde(default)]
    pub emotes: Vec<TokenEmote>,
    /// Super chats and other paid messages
    #[serde(default)]
    pub highlighted: bool,
}

/// Trovo chat message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrovoChatEvent {
    pub id: String,
    pub user_id: String,
    pub nickname: String,
    pub message: String,
    #[serde(default)]
    pub emotes: Vec<TokenEmote>,
    #[serde(default)]
    pub highlighted: bool,
}

/// An event as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    TwitchChatMessage(TwitchChatEvent),
    TwitchAnnouncement(TwitchAnnouncementEvent),
    #[serde(rename = "youtube_chat_message")]
    YouTubeChatMessage(YouTubeChatEvent),
    TrovoChatMessage(TrovoChatEvent),
    UserTimedOut { author_id: String },
    UserBanned { author_id: String },
    MessageDeleted { message_id: String },
}

/// A chat message from one of the supported platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    Twitch {
        chat: TwitchChatEvent,
        /// Announcement color name when the message is an announcement
        announcement: Option<String>,
    },
    YouTube(YouTubeChatEvent),
    Trovo(TrovoChatEvent),
}

impl PlatformEvent {
    /// Platform message id.
    pub fn id(&self) -> &str {
        match self {
            PlatformEvent::Twitch { chat, .. } => &chat.id,
            PlatformEvent::YouTube(e) => &e.id,
            PlatformEvent::Trovo(e) => &e.id,
        }
    }
}

/// A moderation signal that removes already-rendered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationEvent {
    Timeout { author_id: String },
    Ban { author_id: String },
    Delete { message_id: String },
}

/// Where an inbound event goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Chat(PlatformEvent),
    Moderation(ModerationEvent),
}

impl InboundEvent {
    pub fn route(self) -> Route {
        match self {
            InboundEvent::TwitchChatMessage(chat) => Route::Chat(PlatformEvent::Twitch {
                chat,
                announcement: None,
            }),
            InboundEvent::TwitchAnnouncement(event) => Route::Chat(PlatformEvent::Twitch {
                chat: event.chat,
                // An announcement without a color name uses the author's color.
                announcement: Some(event.color_name.unwrap_or_else(|| "primary".to_string())),
            }),
            InboundEvent::YouTubeChatMessage(e) => Route::Chat(PlatformEvent::YouTube(e)),
            InboundEvent::TrovoChatMessage(e) => Route::Chat(PlatformEvent::Trovo(e)),
            InboundEvent::UserTimedOut { author_id } => {
                Route::Moderation(ModerationEvent::Timeout { author_id })
            }
            InboundEvent::UserBanned { author_id } => {
                Route::Moderation(ModerationEvent::Ban { author_id })
            }
            InboundEvent::MessageDeleted { message_id } => {
                Route::Moderation(ModerationEvent::Delete { message_id })
            }
        }
    }
}

/// Decode one line from the transport.
pub fn parse_event(line: &str) -> Result<InboundEvent, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(line)?)
}
