// Library exports for the overlay core and its tests
//
// # Mutex Usage Policy
//
// The visible-message list is the only shared mutable state. It lives behind a
// single `parking_lot::Mutex` (`list::SharedMessageList`) and insert, removal
// and prune all take that one lock, so a removal scan never interleaves with
// a mutation. Never hold the lock across an `.await`.
//
// The pronoun cache in `chat-overlay-pronouns` has its own `parking_lot::Mutex`
// and is never locked while the list lock is held.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod color;
pub mod debug;
pub mod event;
pub mod filter;
pub mod list;
pub mod markup;
pub mod message;
pub mod moderation;
pub mod normalize;
pub mod overlay;
pub mod schedule;

pub use chat_overlay_config::{ConfigError, Direction, OverlayConfig};
pub use color::{ColorModel, OverlayTheme, Rgb};
pub use event::{InboundEvent, ModerationEvent, PlatformEvent, ProtocolError, parse_event};
pub use list::{
    MessageList, NoGeometry, RemovalReason, RenderEffect, RetentionProbe, SharedMessageList,
};
pub use message::{BodySegment, CanonicalMessage, HighlightKind, Platform};
pub use normalize::{NormalizeError, Normalizer, PronounSource};
pub use overlay::Overlay;
pub use schedule::PruneSchedule;
