use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[derive(Debug, Clone)]
pub struct TickMetrics {
    pub tick_number: u64,
    pub duration_us: u128,
    /// Host notifications dispatched during this tick.
    pub event_count: usize,
    pub player_count: usize,
}

impl TickMetrics {
    /// Log at debug level, or warn when the tick ran past its budget.
    pub fn log(&self, budget_us: u128) {
        if self.duration_us > budget_us {
            tracing::warn!(
                tick = self.tick_number,
                duration_us = self.duration_us,
                events = self.event_count,
                players = self.player_count,
                "tick exceeded budget ({}us > {}us)",
                self.duration_us,
                budget_us
            );
        } else {
            tracing::debug!(
                tick = self.tick_number,
                duration_us = self.duration_us,
                events = self.event_count,
                players = self.player_count,
                "tick completed"
            );
        }
    }
}
