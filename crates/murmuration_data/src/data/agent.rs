use super::vector::Vector2;
use serde::{Deserialize, Serialize};

/// Flock membership. Agents sharing an id align and cohere with each other.
pub type FlockId = u32;

/// Display color of an agent. Opaque to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

/// Per-agent steering and perception limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorParams {
    /// Speed cap applied after every integration step.
    pub max_speed: f64,
    /// Magnitude cap for each steering component.
    pub max_force: f64,
    /// Radius of the neighbor query centered on the agent.
    pub neighbor_radius: f64,
    /// Distance from a world edge at which edge avoidance kicks in.
    pub edge_margin: f64,
    /// Full forward perception window in degrees. `None` sees all around.
    pub perception_angle: Option<f64>,
    /// Desired-speed boost for prey fleeing predators. `None` means 1.0.
    pub predator_speed_multiplier: Option<f64>,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_force: 1.0,
            neighbor_radius: 200.0,
            edge_margin: 20.0,
            perception_angle: None,
            predator_speed_multiplier: Some(1.5),
        }
    }
}

impl BehaviorParams {
    #[must_use]
    pub fn flee_multiplier(&self) -> f64 {
        self.predator_speed_multiplier.unwrap_or(1.0)
    }
}

/// A simulated boid.
///
/// `acceleration` is a per-tick accumulator: written by steering, consumed
/// by integration, zero between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vector2,
    pub velocity: Vector2,
    #[serde(skip)]
    pub acceleration: Vector2,
    pub appearance: Appearance,
    pub flock_id: FlockId,
    pub is_predator: bool,
    pub params: BehaviorParams,
}

impl Agent {
    #[must_use]
    pub fn new(position: Vector2, velocity: Vector2, flock_id: FlockId) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2::ZERO,
            appearance: Appearance::default(),
            flock_id,
            is_predator: false,
            params: BehaviorParams::default(),
        }
    }

    #[must_use]
    pub fn predator(position: Vector2, velocity: Vector2, flock_id: FlockId) -> Self {
        Self {
            is_predator: true,
            ..Self::new(position, velocity, flock_id)
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: BehaviorParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    #[must_use]
    pub fn is_same_flock(&self, other: &Agent) -> bool {
        self.flock_id == other.flock_id
    }
}
