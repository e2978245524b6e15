//! Shared integration test helpers for chat-overlay.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{canonical, overlay_with, twitch_line};
//! ```
//!
//! Rust integration tests use `mod common;` (not `use`) to bring in helpers
//! from `tests/common/mod.rs`. The `#![allow(dead_code)]` attribute suppresses
//! warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chat_overlay::{
    BodySegment, CanonicalMessage, HighlightKind, Overlay, OverlayConfig, Platform,
    PronounSource, RemovalReason, RenderEffect, Rgb,
};
use chat_overlay_pronouns::PronounLookup;
use serde_json::json;

/// A canonical message with fixed colors and a one-segment body.
pub fn canonical(id: &str, author_id: &str) -> CanonicalMessage {
    CanonicalMessage {
        id: id.to_string(),
        platform: Platform::Twitch,
        author_id: author_id.to_string(),
        author_name: format!("user-{author_id}"),
        body: vec![BodySegment::text(format!("message {id}"))],
        background: Rgb::BLACK,
        foreground: Rgb::WHITE,
        highlight: HighlightKind::None,
        badges: Vec::new(),
        annotation: None,
        timestamp: None,
    }
}

/// An overlay built from a default config modified by `f`, with no pronoun source.
pub fn overlay_with(f: impl FnOnce(&mut OverlayConfig)) -> Overlay {
    let mut config = OverlayConfig::default();
    f(&mut config);
    Overlay::with_pronouns(Arc::new(config), None)
}

/// An overlay whose pronoun source answers from a fixed table.
pub fn overlay_with_pronouns(
    pronouns: &[(&str, &str)],
    f: impl FnOnce(&mut OverlayConfig),
) -> Overlay {
    let mut config = OverlayConfig::default();
    f(&mut config);
    let source = FixedPronouns(
        pronouns
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    Overlay::with_pronouns(Arc::new(config), Some(Arc::new(source)))
}

pub struct FixedPronouns(pub HashMap<String, String>);

impl PronounSource for FixedPronouns {
    fn lookup(&self, author: &str) -> PronounLookup {
        match self.0.get(&author.to_lowercase()) {
            Some(p) => PronounLookup::Present(p.clone()),
            None => PronounLookup::Absent,
        }
    }
}

/// A `twitch_chat_message` line.
pub fn twitch_line(id: &str, user_id: &str, user_name: &str, message: &str) -> String {
    json!({
        "event": "twitch_chat_message",
        "id": id,
        "user_id": user_id,
        "user_name": user_name,
        "message": message,
    })
    .to_string()
}

/// Ids of visible messages, oldest first.
pub fn visible_ids(overlay: &Overlay) -> Vec<String> {
    overlay.snapshot().into_iter().map(|m| m.id).collect()
}

/// `(id, reason)` for every removal in `effects`.
pub fn removals(effects: &[RenderEffect]) -> Vec<(String, RemovalReason)> {
    effects
        .iter()
        .filter_map(|e| match e {
            RenderEffect::Remove { id, reason } => Some((id.clone(), *reason)),
            _ => None,
        })
        .collect()
}

/// The message of the single `Append` in `effects`.
pub fn appended(effects: &[RenderEffect]) -> Option<&CanonicalMessage> {
    effects.iter().find_map(|e| match e {
        RenderEffect::Append { message } => Some(message),
        _ => None,
    })
}
