//! Moderation dispatch: timeouts, bans and deletes remove rendered messages.
//!
//! There is no state here. Each event maps straight onto a list removal, so
//! events for authors or messages that were never rendered, and repeats of
//! the same event, are harmless no-ops.

use crate::event::ModerationEvent;
use crate::list::{MessageList, RenderEffect};

/// Apply `event` to `list`, returning the removals performed.
pub fn apply(list: &mut MessageList, event: &ModerationEvent) -> Vec<RenderEffect> {
    let effects = match event {
        ModerationEvent::Timeout { author_id } | ModerationEvent::Ban { author_id } => {
            list.remove_by_author(author_id)
        }
        ModerationEvent::Delete { message_id } => list.remove_by_id(message_id),
    };
    if !effects.is_empty() {
        log::debug!("{:?} removed {} message(s)", event, effects.len());
    }
    effects
}
