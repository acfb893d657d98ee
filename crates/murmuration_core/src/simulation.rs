//! The tick driver.
//!
//! One tick runs four strictly ordered phases:
//!
//! 1. **Clear** the spatial index.
//! 2. **Rebuild** it from every agent's current position.
//! 3. **Steer**: each agent queries its neighborhood, applies the neighbor
//!    and perception filters and writes its acceleration. All agents read
//!    the same frozen copy of the pre-tick population.
//! 4. **Integrate**: each agent consumes its acceleration, moves, and the
//!    boundary policy is applied.
//!
//! Between ticks the host may add, remove or overwrite agents freely; the
//! index stores indices only and is rebuilt before it is read again.

use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::geometry::{Circle, Rectangle, Shape};
use crate::lifecycle;
use crate::metrics::{Metrics, TickStats};
use crate::quadtree::{PartitionCell, QuadTree};
use crate::snapshot::{self, PartitionSnapshot, RenderSnapshot};
use crate::systems::{FlockingLogic, SteeringContext};
use murmuration_data::{
    Agent, Appearance, BehaviorParams, FlockId, FlockingWeights, NeighborFilter, Vector2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use web_time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct Simulation {
    agents: Vec<Agent>,
    index: QuadTree,
    config: AppConfig,
    ctx: SteeringContext,
    tick: u64,
    outside: usize,
    palette: Vec<Appearance>,
    /// Smallest id no agent has used; one past `FlockId::MAX` once exhausted.
    next_flock: u64,
    rng: ChaCha8Rng,
    metrics: Metrics,
}

/// Raw neighbor candidates of agent `i`: everything inside its neighbor
/// radius except itself, narrowed by the configured neighbor filter.
///
/// An agent the index rejected at the last rebuild has no neighbors.
fn gather(index: &QuadTree, agents: &[Agent], i: usize, filter: NeighborFilter, out: &mut Vec<usize>) {
    out.clear();
    let me = &agents[i];
    if !index.covers(me.position) {
        return;
    }
    let range = Shape::from(Circle::around(me.position, me.params.neighbor_radius));
    match filter {
        NeighborFilter::All => index.query_filtered(&range, |j| j != i, out),
        NeighborFilter::SameFlock => {
            index.query_filtered(&range, |j| j != i && agents[j].is_same_flock(me), out)
        }
    }
}

/// Steer agent `i` against the frozen `snapshot`. Returns the raw hit count.
fn steer_agent(
    index: &QuadTree,
    snapshot: &[Agent],
    i: usize,
    agent: &mut Agent,
    ctx: &SteeringContext,
    filter: NeighborFilter,
    hits: &mut Vec<usize>,
) -> usize {
    gather(index, snapshot, i, filter, hits);
    let me = &snapshot[i];
    let neighbors: Vec<&Agent> = hits
        .iter()
        .map(|&j| &snapshot[j])
        .filter(|other| me.perceives(other))
        .collect();
    agent.flock(&neighbors, ctx);
    hits.len()
}

impl Simulation {
    /// Validates `config` and spawns its initial population.
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut sim = Self::with_agents(config, Vec::new())?;
        let palette = lifecycle::flock_palette(&mut sim.rng, sim.config.population.flock_count);
        sim.agents = lifecycle::populate(&sim.config, &palette, &mut sim.rng);
        sim.next_flock = u64::from(sim.config.population.flock_count)
            + sim.config.population.initial_predators as u64;
        sim.palette = palette;
        sim.refresh_index();
        tracing::info!(
            agents = sim.agents.len(),
            fingerprint = %sim.config.fingerprint(),
            "Simulation created"
        );
        Ok(sim)
    }

    /// Validates `config` and adopts a host-built population as is.
    pub fn with_agents(config: AppConfig, agents: Vec<Agent>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;

        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let ctx = SteeringContext::new(config.weights, config.bounds(), config.world.boundary);
        let index = QuadTree::new(config.world_rect(), config.index.capacity, config.index.max_depth);
        let next_flock = agents
            .iter()
            .map(|a| u64::from(a.flock_id) + 1)
            .max()
            .unwrap_or(0);

        let mut sim = Self {
            agents,
            index,
            ctx,
            tick: 0,
            outside: 0,
            palette: Vec::new(),
            next_flock,
            rng,
            metrics: Metrics::new(config.log_interval),
            config,
        };
        sim.refresh_index();
        Ok(sim)
    }

    /// Runs one tick with the configured weights.
    pub fn tick(&mut self) {
        self.tick_with(self.config.weights);
    }

    /// Runs one tick with `weights` for this tick only.
    pub fn tick_with(&mut self, weights: FlockingWeights) {
        let started = Instant::now();
        let mut ctx = self.ctx;
        ctx.weights = weights;

        // Clear + Rebuild
        self.refresh_index();

        // Steer
        let visits = self.steer(&ctx);

        // Integrate
        for agent in &mut self.agents {
            agent.update();
            agent.apply_boundary(&ctx);
        }

        self.tick += 1;
        self.spawn_due();

        self.metrics.record_tick(
            started.elapsed(),
            TickStats {
                agents: self.agents.len(),
                nodes: self.index.node_count(),
                neighbor_visits: visits,
                outside: self.outside,
            },
        );
    }

    #[cfg(feature = "parallel")]
    fn steer(&mut self, ctx: &SteeringContext) -> usize {
        let snapshot = self.agents.clone();
        let index = &self.index;
        let filter = self.config.world.neighbor_filter;
        self.agents
            .par_iter_mut()
            .enumerate()
            .map_init(Vec::new, |hits, (i, agent)| {
                steer_agent(index, &snapshot, i, agent, ctx, filter, hits)
            })
            .sum()
    }

    #[cfg(not(feature = "parallel"))]
    fn steer(&mut self, ctx: &SteeringContext) -> usize {
        let snapshot = self.agents.clone();
        let filter = self.config.world.neighbor_filter;
        let mut hits = Vec::new();
        let mut visits = 0;
        for (i, agent) in self.agents.iter_mut().enumerate() {
            visits += steer_agent(&self.index, &snapshot, i, agent, ctx, filter, &mut hits);
        }
        visits
    }

    /// Clears the index and reinserts every agent at its current position.
    ///
    /// `tick` does this first thing; hosts call it to point overlay queries
    /// at post-integration positions.
    pub fn refresh_index(&mut self) {
        self.outside = self.index.rebuild(self.agents.iter().map(|a| a.position));
        if self.outside > 0 {
            tracing::trace!(outside = self.outside, "agents outside world skipped by index");
        }
    }

    fn spawn_due(&mut self) {
        let pop = &self.config.population;
        if pop.spawn_interval == 0
            || self.tick % pop.spawn_interval != 0
            || self.agents.len() >= pop.max_population
            || pop.flock_count == 0
        {
            return;
        }
        let flock_id = self.rng.gen_range(0..pop.flock_count);
        let appearance = self
            .palette
            .get(flock_id as usize)
            .copied()
            .unwrap_or_default();
        let agent = lifecycle::create_prey_with_rng(
            &mut self.rng,
            &self.ctx.bounds,
            flock_id,
            self.config.prey,
            appearance,
        );
        self.agents.push(agent);
        self.metrics.increment_counter("spawn");
    }

    /// Adds `count` prey of a brand-new flock scattered around `center`.
    ///
    /// Positions are drawn from the square of half-size `spread` and clamped
    /// into the world. Returns the indices of the new agents.
    ///
    /// # Errors
    /// Non-finite `center` or `spread`, or no unused flock id left. The
    /// population is untouched on error.
    pub fn spawn_burst(&mut self, center: Vector2, count: usize, spread: f64) -> Result<Range<usize>> {
        for (name, value) in [("center x", center.x), ("center y", center.y), ("spread", spread)] {
            if !value.is_finite() {
                return Err(SimError::NonFinite { name, value });
            }
        }
        let flock_id = FlockId::try_from(self.next_flock).map_err(|_| SimError::FlockIdsExhausted)?;
        self.next_flock += 1;

        let start = self.agents.len();
        let appearance = lifecycle::random_appearance(&mut self.rng);
        let bounds = self.ctx.bounds;
        let spread = spread.abs();

        for _ in 0..count {
            let offset = Vector2::new(
                self.rng.gen_range(-spread..=spread),
                self.rng.gen_range(-spread..=spread),
            );
            let at = center + offset;
            let position = Vector2::new(at.x.clamp(0.0, bounds.width), at.y.clamp(0.0, bounds.height));
            let agent = Agent::new(position, lifecycle::random_velocity(&mut self.rng), flock_id)
                .with_params(self.config.prey)
                .with_appearance(appearance);
            self.agents.push(agent);
        }
        self.metrics.log_event("burst", &format!("{count} agents in flock {flock_id}"));
        self.refresh_index();
        Ok(start..self.agents.len())
    }

    /// Appends an agent and returns its index.
    pub fn add_agent(&mut self, agent: Agent) -> usize {
        self.next_flock = self.next_flock.max(u64::from(agent.flock_id) + 1);
        self.agents.push(agent);
        self.refresh_index();
        self.agents.len() - 1
    }

    /// Removes agent `i`; the last agent takes its index.
    pub fn remove_agent(&mut self, i: usize) -> Result<Agent> {
        if i >= self.agents.len() {
            return Err(SimError::AgentOutOfRange {
                index: i,
                len: self.agents.len(),
            });
        }
        let removed = self.agents.swap_remove(i);
        self.refresh_index();
        Ok(removed)
    }

    /// Moves the world to `[0, width] x [0, height]`.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.world.width = width;
        config.world.height = height;
        config
            .validate()
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        self.config = config;
        self.ctx.bounds = self.config.bounds();
        self.index.reset(self.config.world_rect());
        self.refresh_index();
        Ok(())
    }

    /// Read-only range query against the index as last rebuilt.
    pub fn query_index(&self, shape: &Shape) -> Vec<usize> {
        self.index.query(shape)
    }

    /// Indices agent `i` would steer against: the same query, neighbor
    /// filter and perception filter as the Steer phase.
    pub fn neighbors_of(&self, i: usize) -> Result<Vec<usize>> {
        if i >= self.agents.len() {
            return Err(SimError::AgentOutOfRange {
                index: i,
                len: self.agents.len(),
            });
        }
        let mut hits = Vec::new();
        gather(&self.index, &self.agents, i, self.config.world.neighbor_filter, &mut hits);
        let me = &self.agents[i];
        hits.retain(|&j| me.perceives(&self.agents[j]));
        Ok(hits)
    }

    /// Every index node, for drawing the partition.
    pub fn partition(&self) -> Vec<PartitionCell> {
        self.index.partition()
    }

    #[must_use]
    pub fn partition_snapshot(&self) -> PartitionSnapshot {
        PartitionSnapshot::from_cells(&self.index.partition())
    }

    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self.tick, &self.agents)
    }

    /// Refreshes a host-held frame without reallocating it.
    pub fn snapshot_into(&self, frame: &mut RenderSnapshot) {
        frame.refresh(self.tick, &self.agents);
    }

    pub fn write_kinematics(&self, positions: &mut [f32], velocities: &mut [f32]) -> Result<()> {
        snapshot::write_kinematics(&self.agents, positions, velocities)
    }

    /// Adopts positions and velocities computed by an external kernel.
    pub fn read_kinematics(&mut self, positions: &[f32], velocities: &[f32]) -> Result<()> {
        snapshot::read_kinematics(&mut self.agents, positions, velocities)
    }

    pub fn set_weights(&mut self, weights: FlockingWeights) {
        self.config.weights = weights;
        self.ctx.weights = weights;
    }

    /// Replaces the behavior parameters of every prey agent and of future
    /// spawns.
    pub fn set_prey_params(&mut self, params: BehaviorParams) {
        self.config.prey = params;
        for agent in self.agents.iter_mut().filter(|a| !a.is_predator) {
            agent.params = params;
        }
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access between ticks. The length cannot change here; use
    /// [`Simulation::add_agent`] and [`Simulation::remove_agent`].
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn weights(&self) -> FlockingWeights {
        self.config.weights
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// The whole-world rectangle the index is rooted at.
    #[must_use]
    pub fn world_rect(&self) -> Rectangle {
        self.config.world_rect()
    }
}
