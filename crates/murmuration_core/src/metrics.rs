//! Tick metrics and structured logging.
//!
//! [`Metrics`] is updated once per tick by the driver and emits a
//! `tracing` summary every `log_interval` ticks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use web_time::Instant;

/// Per-tick figures reported by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub agents: usize,
    pub nodes: usize,
    /// Raw query hits across all agents, before perception filtering.
    pub neighbor_visits: usize,
    /// Agents the index rejected because they were outside the world.
    pub outside: usize,
}

/// Serializable view of the collected metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub agents: u64,
    pub nodes: u64,
    pub neighbor_visits: u64,
    pub outside: u64,
    pub last_tick_us: u64,
    /// Wall time since the collector was created.
    pub uptime_ms: u64,
    pub counters: HashMap<String, u64>,
}

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    agent_count: AtomicU64,
    node_count: AtomicU64,
    neighbor_visits: AtomicU64,
    outside: AtomicU64,
    last_tick_us: AtomicU64,
    counters: Mutex<HashMap<String, u64>>,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Metrics {
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            agent_count: AtomicU64::new(0),
            node_count: AtomicU64::new(0),
            neighbor_visits: AtomicU64::new(0),
            outside: AtomicU64::new(0),
            last_tick_us: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, stats: TickStats) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.agent_count.store(stats.agents as u64, Ordering::Relaxed);
        self.node_count.store(stats.nodes as u64, Ordering::Relaxed);
        self.neighbor_visits
            .store(stats.neighbor_visits as u64, Ordering::Relaxed);
        self.outside.store(stats.outside as u64, Ordering::Relaxed);
        let micros = duration.as_micros() as u64;
        self.last_tick_us.store(micros, Ordering::Relaxed);

        tracing::debug!(
            tick,
            agents = stats.agents,
            nodes = stats.nodes,
            visits = stats.neighbor_visits,
            "tick"
        );
        if tick % self.log_interval == 0 {
            tracing::info!(
                tick,
                agents = stats.agents,
                nodes = stats.nodes,
                visits = stats.neighbor_visits,
                outside = stats.outside,
                duration_us = micros,
                "Simulation tick"
            );
        }
        if stats.outside > 0 {
            tracing::trace!(tick, outside = stats.outside, "agents outside world");
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += 1;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn agent_count(&self) -> u64 {
        self.agent_count.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let counters = self
            .counters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        MetricsSummary {
            ticks: self.tick_count(),
            agents: self.agent_count(),
            nodes: self.node_count.load(Ordering::Relaxed),
            neighbor_visits: self.neighbor_visits.load(Ordering::Relaxed),
            outside: self.outside.load(Ordering::Relaxed),
            last_tick_us: self.last_tick_us.load(Ordering::Relaxed),
            uptime_ms: self.elapsed().as_millis() as u64,
            counters,
        }
    }

    /// Logs a simulation event.
    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(event_type, details, "Simulation event");
    }
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when set.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
