use serde::{Deserialize, Serialize};

/// Canvas extent. The world spans `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How agents are kept on the canvas. Exactly one policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Soft repulsion from edges, applied as a steering component.
    #[default]
    Avoid,
    /// Teleport to the opposite edge after integration.
    Wrap,
}

/// Pre-filter applied to raw neighbor query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborFilter {
    /// Every agent in range is a candidate; rule predicates decide.
    #[default]
    All,
    /// Only agents sharing the querying agent's flock id.
    SameFlock,
}

/// User-adjustable intensity of the three flocking components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingWeights {
    pub alignment: f64,
    pub cohesion: f64,
    pub separation: f64,
}

impl Default for FlockingWeights {
    fn default() -> Self {
        Self {
            alignment: 1.0,
            cohesion: 1.0,
            separation: 1.0,
        }
    }
}

impl FlockingWeights {
    #[must_use]
    pub const fn new(alignment: f64, cohesion: f64, separation: f64) -> Self {
        Self {
            alignment,
            cohesion,
            separation,
        }
    }

    /// All components disabled.
    #[must_use]
    pub const fn idle() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        (self.alignment + self.cohesion + self.separation) / 3.0
    }
}
