//! Exclusion filter: drops commands and bot chatter before normalization.

use std::collections::HashSet;

use chat_overlay_config::OverlayConfig;

/// Decides whether a message is suppressed before any other processing.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    command_prefix: Option<String>,
    /// Lowercased author names
    bots: HashSet<String>,
}

impl ExclusionFilter {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            command_prefix: config.cmdprefix.clone().filter(|p| !p.is_empty()),
            bots: config.bot_set(),
        }
    }

    /// True if `body` starts with the command prefix or `author_name` is a listed bot.
    pub fn should_skip(&self, body: &str, author_name: &str) -> bool {
        if let Some(prefix) = &self.command_prefix
            && body.starts_with(prefix.as_str())
        {
            return true;
        }
        !self.bots.is_empty() && self.bots.contains(&author_name.to_lowercase())
    }
}
