//! Prune timing: one delayed bootstrap sweep, then a fixed interval.

use std::time::Duration;

use chat_overlay_config::{MIN_DURATION, OverlayConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneSchedule {
    /// Delay before the first sweep, so the renderer has laid out early messages
    pub bootstrap_delay: Duration,
    pub interval: Duration,
}

impl PruneSchedule {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            bootstrap_delay: config.prune_bootstrap_delay(),
            interval: config.prune_interval(),
        }
    }

    /// A ticker whose first tick fires after the bootstrap delay.
    ///
    /// Missed ticks are delayed rather than bursted.
    pub fn ticker(&self) -> tokio::time::Interval {
        let now = tokio::time::Instant::now();
        let start = now.checked_add(self.bootstrap_delay).unwrap_or(now);
        let period = self.interval.max(MIN_DURATION);
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker
    }
}
