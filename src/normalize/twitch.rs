//! Twitch chat messages and announcements.
//!
//! Emotes arrive as inclusive code-point ranges and badges as an explicit URL list.

use super::body::{encode, twitch_spans};
use super::{Draft, NormalizeError, Normalizer, require_ids};
use crate::event::TwitchChatEvent;
use crate::message::Platform;

pub(super) fn draft(
    normalizer: &Normalizer,
    chat: &TwitchChatEvent,
    announcement: Option<&str>,
) -> Result<Option<Draft>, NormalizeError> {
    if normalizer.should_skip(&chat.message, &chat.user_name) {
        return Ok(None);
    }
    require_ids(Platform::Twitch, &chat.id, &chat.user_id)?;

    let author_name = chat
        .display_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(&chat.user_name)
        .to_string();

    Ok(Some(Draft {
        platform: Platform::Twitch,
        id: chat.id.clone(),
        author_id: chat.user_id.clone(),
        author_name,
        author_login: chat.user_name.clone(),
        body: encode(&chat.message, twitch_spans(&chat.message, &chat.emotes)),
        author_color: chat.color.clone(),
        announcement: announcement.map(str::to_string),
        highlighted: chat.highlighted,
        badges: chat.badges.clone(),
    }))
}
