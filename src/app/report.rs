use crate::model::metrics::MetricsSummary;
use crate::model::simulation::Simulation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// End-of-run summary printed by the CLI.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub agents: usize,
    pub predators: usize,
    pub flocks: usize,
    pub mean_speed: f64,
    pub max_speed: f64,
    /// Agents the index skipped at the last rebuild.
    pub outside: u64,
    pub index_nodes: usize,
    pub index_depth: u32,
    pub elapsed_ms: u64,
    pub fingerprint: String,
    pub metrics: MetricsSummary,
}

impl RunReport {
    #[must_use]
    pub fn collect(sim: &Simulation, elapsed: Duration) -> Self {
        let agents = sim.agents();
        let speeds = agents.iter().map(|a| a.velocity.magnitude());
        let (sum, max) = speeds.fold((0.0, 0.0_f64), |(s, m), v| (s + v, m.max(v)));
        let flocks: BTreeSet<_> = agents
            .iter()
            .filter(|a| !a.is_predator)
            .map(|a| a.flock_id)
            .collect();
        let metrics = sim.metrics().summary();

        Self {
            ticks: sim.tick_count(),
            agents: agents.len(),
            predators: agents.iter().filter(|a| a.is_predator).count(),
            flocks: flocks.len(),
            mean_speed: if agents.is_empty() {
                0.0
            } else {
                sum / agents.len() as f64
            },
            max_speed: max,
            outside: metrics.outside,
            index_nodes: sim.index().node_count(),
            index_depth: sim.index().depth(),
            elapsed_ms: elapsed.as_millis() as u64,
            fingerprint: sim.config().fingerprint(),
            metrics,
        }
    }
}
