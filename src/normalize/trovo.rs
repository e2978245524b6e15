//! Trovo chat messages.

use super::body::{encode, token_spans};
use super::{Draft, NormalizeError, Normalizer, require_ids};
use crate::event::TrovoChatEvent;
use crate::message::Platform;

const TROVO_BADGE: &str = "https://astatic.trovocdn.net/cat/img/trovo-logo.png";

pub(super) fn draft(
    normalizer: &Normalizer,
    event: &TrovoChatEvent,
) -> Result<Option<Draft>, NormalizeError> {
    if normalizer.should_skip(&event.message, &event.nickname) {
        return Ok(None);
    }
    require_ids(Platform::Trovo, &event.id, &event.user_id)?;

    Ok(Some(Draft {
        platform: Platform::Trovo,
        id: event.id.clone(),
        author_id: event.user_id.clone(),
        author_name: event.nickname.clone(),
        author_login: event.nickname.clone(),
        body: encode(&event.message, token_spans(&event.message, &event.emotes)),
        author_color: None,
        announcement: None,
        highlighted: event.highlighted,
        badges: vec![TROVO_BADGE.to_string()],
    }))
}
