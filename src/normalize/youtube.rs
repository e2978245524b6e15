//! YouTube live chat messages.
//!
//! Emoji and stickers arrive as tokens such as `:yt:`. YouTube sends no author
//! color and no badge images, so every message carries the platform badge.

use super::body::{encode, token_spans};
use super::{Draft, NormalizeError, Normalizer, require_ids};
use crate::event::YouTubeChatEvent;
use crate::message::Platform;

const YOUTUBE_BADGE: &str = "https://www.youtube.com/s/desktop/favicon_32x32.png";

pub(super) fn draft(
    normalizer: &Normalizer,
    event: &YouTubeChatEvent,
) -> Result<Option<Draft>, NormalizeError> {
    if normalizer.should_skip(&event.message, &event.author_name) {
        return Ok(None);
    }
    require_ids(Platform::YouTube, &event.id, &event.channel_id)?;

    Ok(Some(Draft {
        platform: Platform::YouTube,
        id: event.id.clone(),
        author_id: event.channel_id.clone(),
        author_name: event.author_name.clone(),
        author_login: event.author_name.clone(),
        body: encode(&event.message, token_spans(&event.message, &event.emotes)),
        author_color: None,
        announcement: None,
        highlighted: event.highlighted,
        badges: vec![YOUTUBE_BADGE.to_string()],
    }))
}
