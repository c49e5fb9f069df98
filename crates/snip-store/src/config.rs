use std::time::Duration;

/// Configuration for a [`PasteStore`](crate::PasteStore).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// How often the background sweeper wakes to reclaim expired pastes.
    /// Coarser than any single paste's TTL is fine: visibility is enforced
    /// at read time, the sweeper only bounds memory.
    pub sweep_interval: Duration,
}

impl StoreConfig {
    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(30),
        }
    }
}
