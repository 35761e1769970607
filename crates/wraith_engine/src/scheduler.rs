//! # Update Scheduler
//!
//! Drives the engine's sync passes at a fixed rate.
//!
//! ## Design
//!
//! - Wall-clock time owed since the last poll becomes due ticks; each due
//!   tick runs one [`Engine::tick`], so dirty models reach their viewers
//!   once per tick and clean models send nothing.
//! - A stalled host catches up at most `max_catch_up` ticks per poll. Older
//!   debt is dropped and counted as skipped.
//! - Timing and sync totals are kept per scheduler, never globally.

use std::time::{Duration, Instant};

use tracing::warn;
use wraith_core::HostTypes;
use wraith_shared::{WraithError, WraithResult};

use crate::config::EngineConfig;
use crate::engine::{Engine, TickReport};
use crate::tracker::SyncStats;

/// Ticks a single poll may run before older debt is dropped.
pub const DEFAULT_MAX_CATCH_UP: u32 = 5;

/// Fixed-rate driver for [`Engine::tick`].
#[derive(Debug)]
pub struct UpdateScheduler {
    tick_duration: Duration,
    last_poll: Instant,
    /// Time not yet turned into ticks.
    owed: Duration,
    max_catch_up: u32,
    stats: TickStats,
}

/// Scheduler statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStats {
    /// Shortest sync pass observed.
    pub min_tick_us: u64,
    /// Longest sync pass observed.
    pub max_tick_us: u64,
    /// Rolling average pass duration.
    pub avg_tick_us: u64,
    /// Passes that overran the tick budget.
    pub late_ticks: u64,
    /// Passes run.
    pub total_ticks: u64,
    /// Due ticks dropped by the catch-up limit.
    pub skipped_ticks: u64,
    /// Sync totals over every pass run.
    pub sync: SyncStats,
}

impl TickStats {
    fn fresh() -> Self {
        Self {
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            avg_tick_us: 0,
            late_ticks: 0,
            total_ticks: 0,
            skipped_ticks: 0,
            sync: SyncStats::default(),
        }
    }

    fn record(&mut self, elapsed: Duration, budget: Duration, sync: &SyncStats) {
        #[allow(clippy::cast_possible_truncation)]
        let us = elapsed.as_micros() as u64;

        self.avg_tick_us = if self.total_ticks == 0 {
            us
        } else {
            (self.avg_tick_us * 15 + us) / 16
        };
        self.total_ticks += 1;
        self.min_tick_us = self.min_tick_us.min(us);
        self.max_tick_us = self.max_tick_us.max(us);
        if elapsed > budget {
            self.late_ticks += 1;
        }
        self.sync.accumulate(sync);
    }
}

impl UpdateScheduler {
    /// Creates a scheduler running `tick_rate` ticks per second.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `tick_rate` is 0.
    pub fn new(tick_rate: u32) -> WraithResult<Self> {
        if tick_rate == 0 {
            return Err(WraithError::InvalidConfig(
                "tick_rate must be at least 1".to_owned(),
            ));
        }
        Ok(Self {
            tick_duration: Duration::from_secs(1) / tick_rate,
            last_poll: Instant::now(),
            owed: Duration::ZERO,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            stats: TickStats::fresh(),
        })
    }

    /// Creates a scheduler at the configured tick rate.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the tick rate is 0.
    pub fn for_config(config: &EngineConfig) -> WraithResult<Self> {
        Self::new(config.tick_rate)
    }

    /// Caps the ticks one poll may run. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_catch_up(mut self, ticks: u32) -> Self {
        self.max_catch_up = ticks.max(1);
        self
    }

    /// Runs every tick that has come due since the last poll.
    ///
    /// Returns one report per pass, oldest first; empty if no tick is due.
    pub fn run_due<H: HostTypes>(&mut self, engine: &Engine<H>) -> Vec<TickReport> {
        let due = self.poll();
        (0..due).map(|_| self.run_tick(engine)).collect()
    }

    /// Runs one sync pass now, regardless of the clock.
    pub fn run_tick<H: HostTypes>(&mut self, engine: &Engine<H>) -> TickReport {
        let start = Instant::now();
        let report = engine.tick();
        self.stats
            .record(start.elapsed(), self.tick_duration, &report.sync);
        report
    }

    /// Converts time since the last poll into due ticks, dropping debt past
    /// the catch-up limit.
    fn poll(&mut self) -> u32 {
        let now = Instant::now();
        self.owed += now.duration_since(self.last_poll);
        self.last_poll = now;

        let mut due = 0;
        let mut skipped = 0u64;
        while self.owed >= self.tick_duration {
            self.owed -= self.tick_duration;
            if due < self.max_catch_up {
                due += 1;
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            self.stats.skipped_ticks += skipped;
            warn!(skipped, "Scheduler fell behind, dropping ticks");
        }
        due
    }

    /// Sleeps until the next tick is due.
    pub fn wait_for_next_tick(&self) {
        let elapsed = self.last_poll.elapsed() + self.owed;
        if elapsed < self.tick_duration {
            std::thread::sleep(self.tick_duration - elapsed);
        }
    }

    /// Statistics so far.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Target tick duration.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_creation() {
        let scheduler = UpdateScheduler::new(20).unwrap();
        assert_eq!(scheduler.tick_duration(), Duration::from_millis(50));
        assert_eq!(scheduler.stats().total_ticks, 0);
        assert_eq!(scheduler.stats().sync, SyncStats::default());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            UpdateScheduler::new(0),
            Err(WraithError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_for_config_uses_tick_rate() {
        let config = EngineConfig {
            tick_rate: 10,
            ..EngineConfig::default()
        };
        let scheduler = UpdateScheduler::for_config(&config).unwrap();
        assert_eq!(scheduler.tick_duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_nothing_due_before_a_tick_elapses() {
        let mut scheduler = UpdateScheduler::new(1).unwrap();
        assert_eq!(scheduler.poll(), 0);
        assert_eq!(scheduler.stats().skipped_ticks, 0);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut scheduler = UpdateScheduler::new(1000).unwrap().with_max_catch_up(2);
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(scheduler.poll(), 2);
        assert!(scheduler.stats().skipped_ticks >= 10);
        assert!(scheduler.owed < scheduler.tick_duration());
    }

    #[test]
    fn test_catch_up_floor() {
        let mut scheduler = UpdateScheduler::new(1000).unwrap().with_max_catch_up(0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(scheduler.poll(), 1);
    }

    #[test]
    fn test_record_tracks_timing_and_sync() {
        let mut stats = TickStats::fresh();
        let budget = Duration::from_millis(1);
        let sync = SyncStats {
            total_models: 3,
            dirty_models: 1,
            pushed_models: 1,
            properties_pushed: 2,
            properties_total: 51,
        };

        stats.record(Duration::from_micros(400), budget, &sync);
        stats.record(Duration::from_micros(1_600), budget, &SyncStats::default());

        assert_eq!(stats.total_ticks, 2);
        assert_eq!(stats.min_tick_us, 400);
        assert_eq!(stats.max_tick_us, 1_600);
        assert_eq!(stats.avg_tick_us, (400 * 15 + 1_600) / 16);
        assert_eq!(stats.late_ticks, 1);
        assert_eq!(stats.sync.properties_pushed, 2);
        assert_eq!(stats.sync.properties_total, 51);
    }
}
