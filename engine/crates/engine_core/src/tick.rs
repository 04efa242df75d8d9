use std::time::{Duration, Instant};

/// Tick loop configuration.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Ticks per second.
    pub tps: u32,
    /// Maximum ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tps: 10,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps.max(1) as f64)
    }
}

/// Work performed once per server heartbeat.
pub trait TickHandler {
    /// Run one tick. Returns the number of notifications dispatched during it.
    fn on_tick(&mut self, tick: u64) -> usize;

    /// Number of players currently connected, for metrics.
    fn player_count(&self) -> usize {
        0
    }
}

/// Fixed-rate heartbeat driving a [`TickHandler`].
pub struct TickLoop<H: TickHandler> {
    pub handler: H,
    pub config: TickConfig,
    pub current_tick: u64,
}

impl<H: TickHandler> TickLoop<H> {
    pub fn new(config: TickConfig, handler: H) -> Self {
        Self {
            handler,
            config,
            current_tick: 0,
        }
    }

    /// Execute a single tick and report its metrics.
    pub fn step(&mut self) -> observability::TickMetrics {
        let start = Instant::now();
        let event_count = self.handler.on_tick(self.current_tick);
        self.current_tick += 1;

        observability::TickMetrics {
            tick_number: self.current_tick,
            duration_us: start.elapsed().as_micros(),
            event_count,
            player_count: self.handler.player_count(),
        }
    }

    /// Run until `max_ticks` is reached or `should_stop` returns true.
    pub fn run_until(&mut self, mut should_stop: impl FnMut() -> bool) -> u64 {
        let tick_duration = self.config.tick_duration();
        let budget_us = tick_duration.as_micros();

        loop {
            if self.config.max_ticks > 0 && self.current_tick >= self.config.max_ticks {
                break;
            }
            if should_stop() {
                tracing::info!(tick = self.current_tick, "tick loop: stop requested");
                break;
            }

            let tick_start = Instant::now();
            let metrics = self.step();
            metrics.log(budget_us);

            // Sleep until next tick
            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            }
        }

        self.current_tick
    }

    /// Run for the configured number of ticks (or forever when `max_ticks` is 0).
    pub fn run(&mut self) -> u64 {
        self.run_until(|| false)
    }
}
