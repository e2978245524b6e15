//! Bounded, ordered list of visible messages.
//!
//! [`MessageList`] decides *what* is visible; the renderer decides how it is
//! drawn. Every mutating call returns the [`RenderEffect`]s the renderer must
//! apply. Messages are kept oldest first and leave the list in one of three
//! ways: capacity eviction and expiry (both during [`MessageList::prune`]),
//! or targeted removal on moderation.
//!
//! The list is not internally synchronized. Share it as [`SharedMessageList`]
//! so insert, removal and prune are serialized behind one lock.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chat_overlay_config::{Direction, OverlayConfig};
use parking_lot::Mutex;
use serde::Serialize;

use crate::message::CanonicalMessage;

/// The list behind the single lock that covers insert, remove and prune.
pub type SharedMessageList = Arc<Mutex<MessageList>>;

/// Why a message left the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// More than `max_messages` were visible
    Capacity,
    /// Faded out or scrolled out of the viewport
    Expired,
    /// Timeout, ban or delete
    Moderation,
}

/// A change the renderer must apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum RenderEffect {
    Append { message: CanonicalMessage },
    Remove { id: String, reason: RemovalReason },
    ScrollToNewest,
}

/// Geometry answers from the renderer.
///
/// Reports whether an entry has left its retention window: scrolled past the
/// top edge for vertical lists, past the leading edge for horizontal ones.
pub trait RetentionProbe {
    fn is_outside(&self, id: &str, direction: Direction) -> bool;
}

/// Probe for renderers that report no geometry; nothing is ever outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl RetentionProbe for NoGeometry {
    fn is_outside(&self, _id: &str, _direction: Direction) -> bool {
        false
    }
}

impl<F> RetentionProbe for F
where
    F: Fn(&str, Direction) -> bool,
{
    fn is_outside(&self, id: &str, direction: Direction) -> bool {
        self(id, direction)
    }
}

/// A message currently on screen.
#[derive(Debug, Clone)]
pub struct VisibleMessage {
    /// Monotonic insertion sequence number
    pub seq: u64,
    pub inserted_at: Instant,
    pub message: CanonicalMessage,
}

/// Insertion-ordered list of visible messages.
#[derive(Debug)]
pub struct MessageList {
    entries: VecDeque<VisibleMessage>,
    /// Ids of every entry, for O(1) duplicate checks
    ids: HashSet<String>,
    next_seq: u64,
    max_messages: Option<usize>,
    fade: Option<Duration>,
    direction: Direction,
}

impl MessageList {
    pub fn new(config: &OverlayConfig) -> Self {
        Self::with_limits(config.max_messages, config.fade(), config.direction)
    }

    /// `max_messages` of `None` or `Some(0)` is unbounded.
    pub fn with_limits(
        max_messages: Option<usize>,
        fade: Option<Duration>,
        direction: Direction,
    ) -> Self {
        Self {
            entries: VecDeque::new(),
            ids: HashSet::new(),
            next_seq: 0,
            max_messages: max_messages.filter(|max| *max > 0),
            fade: fade.filter(|d| !d.is_zero()),
            direction,
        }
    }

    /// Wrap in the shared lock.
    pub fn into_shared(self) -> SharedMessageList {
        Arc::new(Mutex::new(self))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Visible messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleMessage> {
        self.entries.iter()
    }

    /// Ids of visible messages, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.message.id.clone()).collect()
    }

    /// Copy of the visible messages, oldest first.
    pub fn snapshot(&self) -> Vec<CanonicalMessage> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    /// Append `message` as the newest entry.
    pub fn insert(&mut self, message: CanonicalMessage) -> Vec<RenderEffect> {
        self.insert_at(message, Instant::now())
    }

    /// Append `message` as the newest entry, recording `now` as its insertion time.
    ///
    /// An id that is already visible is ignored and produces no effects.
    pub fn insert_at(&mut self, message: CanonicalMessage, now: Instant) -> Vec<RenderEffect> {
        if self.ids.contains(&message.id) {
            log::debug!("Ignoring duplicate message {}", message.id);
            return Vec::new();
        }

        self.ids.insert(message.id.clone());
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(VisibleMessage {
            seq,
            inserted_at: now,
            message: message.clone(),
        });

        vec![RenderEffect::Append { message }, RenderEffect::ScrollToNewest]
    }

    /// Remove messages over capacity, then messages that have expired.
    ///
    /// Expired means the probe reports the entry outside its retention window,
    /// or a fade duration is configured and has fully elapsed. Safe to call
    /// any number of times.
    pub fn prune(&mut self, now: Instant, probe: &dyn RetentionProbe) -> Vec<RenderEffect> {
        let mut effects = Vec::new();

        if let Some(max) = self.max_messages {
            while self.entries.len() > max {
                if let Some(evicted) = self.entries.pop_front() {
                    log::debug!("Evicting {} over capacity {}", evicted.message.id, max);
                    self.ids.remove(&evicted.message.id);
                    effects.push(RenderEffect::Remove {
                        id: evicted.message.id,
                        reason: RemovalReason::Capacity,
                    });
                }
            }
        }

        let direction = self.direction;
        let fade = self.fade;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| {
                let faded = fade.is_some_and(|fade| {
                    now.saturating_duration_since(entry.inserted_at) >= fade
                });
                faded || probe.is_outside(&entry.message.id, direction)
            })
            .map(|entry| entry.message.id.clone())
            .collect();

        if !expired.is_empty() {
            let gone: HashSet<&str> = expired.iter().map(String::as_str).collect();
            self.entries.retain(|entry| !gone.contains(entry.message.id.as_str()));
            for id in expired {
                log::debug!("Expiring {}", id);
                self.ids.remove(&id);
                effects.push(RenderEffect::Remove {
                    id,
                    reason: RemovalReason::Expired,
                });
            }
        }

        effects
    }

    /// Remove the message with `id`. Absent ids are a no-op.
    pub fn remove_by_id(&mut self, id: &str) -> Vec<RenderEffect> {
        if !self.ids.remove(id) {
            return Vec::new();
        }
        self.entries.retain(|entry| entry.message.id != id);
        vec![RenderEffect::Remove {
            id: id.to_string(),
            reason: RemovalReason::Moderation,
        }]
    }

    /// Remove every visible message by `author_id`. No matches is a no-op.
    pub fn remove_by_author(&mut self, author_id: &str) -> Vec<RenderEffect> {
        let mut effects = Vec::new();
        let ids = &mut self.ids;
        self.entries.retain(|entry| {
            if entry.message.author_id == author_id {
                ids.remove(&entry.message.id);
                effects.push(RenderEffect::Remove {
                    id: entry.message.id.clone(),
                    reason: RemovalReason::Moderation,
                });
                false
            } else {
                true
            }
        });
        effects
    }

    /// Opacity of `id` at `now`: 1.0 without a fade, falling linearly to 0.0 across it.
    pub fn opacity_at(&self, id: &str, now: Instant) -> Option<f32> {
        let entry = self.entries.iter().find(|e| e.message.id == id)?;
        let Some(fade) = self.fade else {
            return Some(1.0);
        };
        let age = now.saturating_duration_since(entry.inserted_at);
        let remaining = 1.0 - age.as_secs_f32() / fade.as_secs_f32();
        Some(remaining.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::message::{BodySegment, HighlightKind, Platform};

    fn msg(id: &str, author: &str) -> CanonicalMessage {
        CanonicalMessage {
            id: id.to_string(),
            platform: Platform::Twitch,
            author_id: author.to_string(),
            author_name: author.to_uppercase(),
            body: vec![BodySegment::text("hello")],
            background: Rgb::BLACK,
            foreground: Rgb::WHITE,
            highlight: HighlightKind::None,
            badges: Vec::new(),
            annotation: None,
            timestamp: None,
        }
    }

    fn unbounded() -> MessageList {
        MessageList::with_limits(None, None, Direction::Vertical)
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut list = unbounded();
        for i in 0..5 {
            list.insert(msg(&format!("m{i}"), "a"));
        }
        assert_eq!(list.ids(), vec!["m0", "m1", "m2", "m3", "m4"]);
        let seqs: Vec<u64> = list.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_insert_effects() {
        let mut list = unbounded();
        let effects = list.insert(msg("m0", "a"));
        assert_eq!(effects.len(), 2);
        assert!(matches!(&effects[0], RenderEffect::Append { message } if message.id == "m0"));
        assert_eq!(effects[1], RenderEffect::ScrollToNewest);
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let mut list = unbounded();
        list.insert(msg("m0", "a"));
        let effects = list.insert(msg("m0", "b"));
        assert!(effects.is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().unwrap().message.author_id, "a");
    }

    #[test]
    fn test_id_reusable_after_removal() {
        let mut list = unbounded();
        list.insert(msg("m0", "a"));
        list.remove_by_id("m0");
        assert_eq!(list.insert(msg("m0", "a")).len(), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_prune_capacity_keeps_newest() {
        let mut list = MessageList::with_limits(Some(3), None, Direction::Vertical);
        for i in 0..5 {
            list.insert(msg(&format!("m{i}"), "a"));
        }
        // Insert does not evict on its own.
        assert_eq!(list.len(), 5);

        let effects = list.prune(Instant::now(), &NoGeometry);
        assert_eq!(
            effects,
            vec![
                RenderEffect::Remove {
                    id: "m0".to_string(),
                    reason: RemovalReason::Capacity
                },
                RenderEffect::Remove {
                    id: "m1".to_string(),
                    reason: RemovalReason::Capacity
                },
            ]
        );
        assert_eq!(list.ids(), vec!["m2", "m3", "m4"]);
        assert!(!list.contains("m0"));
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let mut list = MessageList::with_limits(Some(0), None, Direction::Vertical);
        for i in 0..10 {
            list.insert(msg(&format!("m{i}"), "a"));
        }
        assert!(list.prune(Instant::now(), &NoGeometry).is_empty());
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut list = MessageList::with_limits(Some(2), None, Direction::Vertical);
        for i in 0..4 {
            list.insert(msg(&format!("m{i}"), "a"));
        }
        let now = Instant::now();
        assert_eq!(list.prune(now, &NoGeometry).len(), 2);
        assert!(list.prune(now, &NoGeometry).is_empty());
        assert_eq!(list.ids(), vec!["m2", "m3"]);
    }

    #[test]
    fn test_prune_fade_expiry() {
        let start = Instant::now();
        let mut list =
            MessageList::with_limits(None, Some(Duration::from_secs(10)), Direction::Vertical);
        list.insert_at(msg("old", "a"), start);
        list.insert_at(msg("new", "a"), start + Duration::from_secs(8));

        assert!(list.prune(start + Duration::from_secs(9), &NoGeometry).is_empty());

        let effects = list.prune(start + Duration::from_secs(10), &NoGeometry);
        assert_eq!(
            effects,
            vec![RenderEffect::Remove {
                id: "old".to_string(),
                reason: RemovalReason::Expired
            }]
        );
        assert_eq!(list.ids(), vec!["new"]);
    }

    #[test]
    fn test_prune_geometry_expiry() {
        let mut list = MessageList::with_limits(None, None, Direction::Horizontal);
        list.insert(msg("m0", "a"));
        list.insert(msg("m1", "a"));

        let probe = |id: &str, direction: Direction| {
            assert_eq!(direction, Direction::Horizontal);
            id == "m0"
        };
        let effects = list.prune(Instant::now(), &probe);
        assert_eq!(effects.len(), 1);
        assert_eq!(list.ids(), vec!["m1"]);
    }

    #[test]
    fn test_capacity_then_expiry_in_one_sweep() {
        let start = Instant::now();
        let mut list =
            MessageList::with_limits(Some(2), Some(Duration::from_secs(5)), Direction::Vertical);
        list.insert_at(msg("m0", "a"), start);
        list.insert_at(msg("m1", "a"), start);
        list.insert_at(msg("m2", "a"), start + Duration::from_secs(4));

        let effects = list.prune(start + Duration::from_secs(6), &NoGeometry);
        let reasons: Vec<_> = effects
            .iter()
            .map(|e| match e {
                RenderEffect::Remove { id, reason } => (id.as_str(), *reason),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("m0", RemovalReason::Capacity),
                ("m1", RemovalReason::Expired)
            ]
        );
        assert_eq!(list.ids(), vec!["m2"]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = unbounded();
        list.insert(msg("m0", "a"));
        list.insert(msg("m1", "a"));
        assert_eq!(list.remove_by_id("m0").len(), 1);
        assert_eq!(list.ids(), vec!["m1"]);
        assert!(list.remove_by_id("m0").is_empty());
        assert!(list.remove_by_id("never").is_empty());
        assert_eq!(list.ids(), vec!["m1"]);
    }

    #[test]
    fn test_remove_by_author() {
        let mut list = unbounded();
        list.insert(msg("m0", "a"));
        list.insert(msg("m1", "b"));
        list.insert(msg("m2", "a"));
        list.insert(msg("m3", "c"));

        let effects = list.remove_by_author("a");
        assert_eq!(effects.len(), 2);
        assert_eq!(list.ids(), vec!["m1", "m3"]);
        assert!(!list.contains("m2"));

        assert!(list.remove_by_author("a").is_empty());
        assert!(list.remove_by_author("nobody").is_empty());
        assert_eq!(list.ids(), vec!["m1", "m3"]);
    }

    #[test]
    fn test_opacity() {
        let start = Instant::now();
        let mut list =
            MessageList::with_limits(None, Some(Duration::from_secs(10)), Direction::Vertical);
        list.insert_at(msg("m0", "a"), start);

        assert_eq!(list.opacity_at("m0", start), Some(1.0));
        let half = list.opacity_at("m0", start + Duration::from_secs(5)).unwrap();
        assert!((half - 0.5).abs() < 1e-6);
        assert_eq!(list.opacity_at("m0", start + Duration::from_secs(20)), Some(0.0));
        assert_eq!(list.opacity_at("missing", start), None);

        let mut steady = unbounded();
        steady.insert_at(msg("m0", "a"), start);
        assert_eq!(steady.opacity_at("m0", start + Duration::from_secs(999)), Some(1.0));
    }
}
