//! Flat buffers exchanged with renderers and external numeric kernels.
//!
//! All kinematic buffers are agent-major `(x, y)` pairs: agent `i` lives at
//! offsets `2 * i` and `2 * i + 1`.

use crate::error::{Result, SimError};
use crate::quadtree::PartitionCell;
use murmuration_data::{Agent, Vector2};
use serde::{Deserialize, Serialize};

/// Frame data consumed by a renderer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub count: usize,
    pub positions: Vec<f32>,
    pub velocities: Vec<f32>,
    /// `(r, g, b)` triplets.
    pub colors: Vec<u8>,
    /// 1 for predators, 0 for prey.
    pub predators: Vec<u8>,
}

impl RenderSnapshot {
    #[must_use]
    pub fn capture(tick: u64, agents: &[Agent]) -> Self {
        let mut snap = Self {
            tick,
            count: 0,
            positions: Vec::new(),
            velocities: Vec::new(),
            colors: Vec::new(),
            predators: Vec::new(),
        };
        snap.refresh(tick, agents);
        snap
    }

    /// Overwrites this frame in place, reusing its allocations.
    pub fn refresh(&mut self, tick: u64, agents: &[Agent]) {
        let count = agents.len();
        self.tick = tick;
        self.count = count;
        self.positions.resize(count * 2, 0.0);
        self.velocities.resize(count * 2, 0.0);
        self.colors.clear();
        self.predators.clear();
        for (i, agent) in agents.iter().enumerate() {
            store(&mut self.positions, i, agent.position);
            store(&mut self.velocities, i, agent.velocity);
            let c = agent.appearance;
            self.colors.extend_from_slice(&[c.r, c.g, c.b]);
            self.predators.push(u8::from(agent.is_predator));
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Quadtree overlay: one `(center x, center y, width, height)` quad per node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PartitionSnapshot {
    pub rects: Vec<f32>,
    pub depths: Vec<u32>,
    pub occupancy: Vec<u32>,
}

impl PartitionSnapshot {
    #[must_use]
    pub fn from_cells(cells: &[PartitionCell]) -> Self {
        let mut snap = Self {
            rects: Vec::with_capacity(cells.len() * 4),
            depths: Vec::with_capacity(cells.len()),
            occupancy: Vec::with_capacity(cells.len()),
        };
        for cell in cells {
            let b = cell.boundary;
            snap.rects
                .extend_from_slice(&[b.x as f32, b.y as f32, b.w as f32, b.h as f32]);
            snap.depths.push(cell.depth);
            snap.occupancy.push(cell.occupancy as u32);
        }
        snap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

#[inline]
fn store(buf: &mut [f32], i: usize, v: Vector2) {
    buf[2 * i] = v.x as f32;
    buf[2 * i + 1] = v.y as f32;
}

#[inline]
fn load(buf: &[f32], i: usize) -> Vector2 {
    Vector2::new(f64::from(buf[2 * i]), f64::from(buf[2 * i + 1]))
}

fn check_len(agents: usize, actual: usize) -> Result<()> {
    let expected = agents * 2;
    if actual != expected {
        return Err(SimError::BufferLength { expected, actual });
    }
    Ok(())
}

/// Copy positions and velocities into caller-owned buffers.
pub fn write_kinematics(agents: &[Agent], positions: &mut [f32], velocities: &mut [f32]) -> Result<()> {
    check_len(agents.len(), positions.len())?;
    check_len(agents.len(), velocities.len())?;
    for (i, agent) in agents.iter().enumerate() {
        store(positions, i, agent.position);
        store(velocities, i, agent.velocity);
    }
    Ok(())
}

/// Copy results computed elsewhere back onto the agents.
///
/// Buffers are length-checked before any agent is touched. Accumulated
/// acceleration is discarded: the buffers are the new tick-boundary state.
pub fn read_kinematics(agents: &mut [Agent], positions: &[f32], velocities: &[f32]) -> Result<()> {
    check_len(agents.len(), positions.len())?;
    check_len(agents.len(), velocities.len())?;
    for (i, agent) in agents.iter_mut().enumerate() {
        agent.position = load(positions, i);
        agent.velocity = load(velocities, i);
        agent.acceleration = Vector2::ZERO;
    }
    Ok(())
}
