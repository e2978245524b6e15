//! Body encoding shared by all platform normalizers.
//!
//! A body is split into escaped text runs and media references. Platforms
//! differ only in how they locate media: Twitch sends code-point ranges,
//! YouTube and Trovo send tokens that are replaced wherever they occur.

use regex::Regex;

use crate::event::{TokenEmote, TwitchEmote};
use crate::markup::escape_text;
use crate::message::BodySegment;

/// Twitch CDN template for emotes that only carry an id.
const TWITCH_EMOTE_URL: &str = "https://static-cdn.jtvnw.net/emoticons/v2/{id}/default/dark/1.0";

/// A media occurrence as a byte range into the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaSpan {
    pub start: usize,
    /// Exclusive
    pub end: usize,
    pub url: String,
}

/// Split `text` around `spans`, escaping every text run.
///
/// Spans are ordered by start position; ties keep their original order.
/// A span overlapping an earlier one, or falling outside the text, is dropped.
pub(crate) fn encode(text: &str, mut spans: Vec<MediaSpan>) -> Vec<BodySegment> {
    spans.sort_by_key(|span| span.start);

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        let valid = span.start >= cursor
            && span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !valid {
            log::warn!(
                "Dropping media span {}..{} ({}) in a {}-byte message",
                span.start,
                span.end,
                span.url,
                text.len()
            );
            continue;
        }
        if span.start > cursor {
            segments.push(BodySegment::text(escape_text(&text[cursor..span.start])));
        }
        segments.push(BodySegment::media(
            span.url,
            escape_text(&text[span.start..span.end]),
        ));
        cursor = span.end;
    }
    if cursor < text.len() {
        segments.push(BodySegment::text(escape_text(&text[cursor..])));
    }
    segments
}

/// Convert Twitch inclusive code-point ranges to byte spans.
pub(crate) fn twitch_spans(text: &str, emotes: &[TwitchEmote]) -> Vec<MediaSpan> {
    // Byte offset of every code point, plus the end of the text.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    emotes
        .iter()
        .filter_map(|emote| {
            let url = match (&emote.url, &emote.id) {
                (Some(url), _) => url.clone(),
                (None, Some(id)) => TWITCH_EMOTE_URL.replace("{id}", id),
                (None, None) => {
                    log::warn!("Twitch emote at {} has neither url nor id", emote.start);
                    return None;
                }
            };
            let start = offsets.get(emote.start).copied();
            let end = emote
                .end
                .checked_add(1)
                .and_then(|end| offsets.get(end).copied());
            match (start, end) {
                (Some(start), Some(end)) if emote.start <= emote.end => {
                    Some(MediaSpan { start, end, url })
                }
                _ => {
                    log::warn!(
                        "Twitch emote range {}-{} is outside the message",
                        emote.start,
                        emote.end
                    );
                    None
                }
            }
        })
        .collect()
}

/// Find every occurrence of every token.
///
/// Tokens are matched leftmost-first in the order given, so when two tokens
/// start at the same position the earlier one wins.
pub(crate) fn token_spans(text: &str, emotes: &[TokenEmote]) -> Vec<MediaSpan> {
    let usable: Vec<&TokenEmote> = emotes.iter().filter(|e| !e.token.is_empty()).collect();
    if usable.is_empty() {
        return Vec::new();
    }

    let pattern = usable
        .iter()
        .map(|e| regex::escape(&e.token))
        .collect::<Vec<_>>()
        .join("|");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Failed to build emote token pattern: {}", e);
            return Vec::new();
        }
    };

    re.find_iter(text)
        .filter_map(|m| {
            usable
                .iter()
                .find(|e| e.token == m.as_str())
                .map(|e| MediaSpan {
                    start: m.start(),
                    end: m.end(),
                    url: e.url.clone(),
                })
        })
        .collect()
}
