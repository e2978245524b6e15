//! The overlay core: wires normalization, moderation and the visible list.
//!
//! [`Overlay`] is built once from an explicit [`OverlayConfig`] and then fed
//! inbound events one at a time. Pruning runs separately on its own timer;
//! both paths go through the same list lock.

use std::sync::Arc;
use std::time::Instant;

use chat_overlay_config::OverlayConfig;
use chat_overlay_pronouns::{HttpPronounFetcher, PronounResolver};

use crate::color::{ColorModel, OverlayTheme};
use crate::event::{InboundEvent, Route, parse_event};
use crate::list::{MessageList, RenderEffect, RetentionProbe, SharedMessageList};
use crate::message::CanonicalMessage;
use crate::moderation;
use crate::normalize::{Normalizer, PronounSource};

pub struct Overlay {
    config: Arc<OverlayConfig>,
    colors: ColorModel,
    normalizer: Normalizer,
    list: SharedMessageList,
}

impl Overlay {
    /// Build the overlay, querying the pronoun service if pronouns are enabled.
    ///
    /// An unusable pronoun service URL disables pronouns rather than failing.
    pub fn new(config: Arc<OverlayConfig>) -> Self {
        let pronouns: Option<Arc<dyn PronounSource>> = if config.pronouns {
            match HttpPronounFetcher::new(&config.pronoun_api_url) {
                Ok(fetcher) => Some(Arc::new(PronounResolver::new(Arc::new(fetcher)))),
                Err(e) => {
                    log::warn!("Pronouns disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self::with_pronouns(config, pronouns)
    }

    /// Build the overlay with an explicit pronoun source.
    pub fn with_pronouns(
        config: Arc<OverlayConfig>,
        pronouns: Option<Arc<dyn PronounSource>>,
    ) -> Self {
        let colors = ColorModel::new(&config);
        let normalizer = Normalizer::new(Arc::clone(&config), colors.clone(), pronouns);
        let list = MessageList::new(&config).into_shared();
        Self {
            config,
            colors,
            normalizer,
            list,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Handle to the visible list, shared with the prune timer.
    pub fn list(&self) -> SharedMessageList {
        Arc::clone(&self.list)
    }

    /// Page-level colors for the renderer.
    pub fn theme(&self) -> OverlayTheme {
        self.colors.theme()
    }

    /// Process one inbound event.
    ///
    /// Never fails: a message that cannot be normalized is logged and dropped
    /// so later events are unaffected.
    pub fn handle(&self, event: InboundEvent) -> Vec<RenderEffect> {
        match event.route() {
            Route::Chat(chat) => match self.normalizer.normalize(&chat) {
                Ok(Some(message)) => self.list.lock().insert(message),
                Ok(None) => Vec::new(),
                Err(e) => {
                    log::warn!("Dropping message {}: {}", chat.id(), e);
                    Vec::new()
                }
            },
            Route::Moderation(event) => moderation::apply(&mut self.list.lock(), &event),
        }
    }

    /// Decode and process one line from the transport.
    pub fn handle_line(&self, line: &str) -> Vec<RenderEffect> {
        match parse_event(line) {
            Ok(event) => self.handle(event),
            Err(e) => {
                log::warn!("Ignoring inbound line: {}", e);
                Vec::new()
            }
        }
    }

    /// Run one prune sweep.
    pub fn prune(&self, now: Instant, probe: &dyn RetentionProbe) -> Vec<RenderEffect> {
        self.list.lock().prune(now, probe)
    }

    pub fn snapshot(&self) -> Vec<CanonicalMessage> {
        self.list.lock().snapshot()
    }

    pub fn opacity_at(&self, id: &str, now: Instant) -> Option<f32> {
        self.list.lock().opacity_at(id, now)
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("visible", &self.list.lock().len())
            .finish_non_exhaustive()
    }
}
