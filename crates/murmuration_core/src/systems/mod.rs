//! Per-agent flocking systems.
//!
//! The pieces are plain functions; [`FlockingLogic`] bundles them as
//! methods on [`Agent`] so the driver reads as `agent.flock(..)` followed by
//! `agent.update()`.

pub mod boundary;
pub mod integration;
pub mod perception;
pub mod rules;
pub mod steering;

use murmuration_data::{Agent, BoundaryPolicy, FlockingWeights, Vector2, WorldBounds};

/// Tick-wide inputs shared by every agent's steering step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringContext {
    pub weights: FlockingWeights,
    pub bounds: WorldBounds,
    pub boundary: BoundaryPolicy,
}

impl SteeringContext {
    #[must_use]
    pub fn new(weights: FlockingWeights, bounds: WorldBounds, boundary: BoundaryPolicy) -> Self {
        Self {
            weights,
            bounds,
            boundary,
        }
    }
}

pub trait FlockingLogic {
    /// Weighted sum of every enabled steering component.
    #[must_use]
    fn steering(&self, neighbors: &[&Agent], ctx: &SteeringContext) -> Vector2;

    /// Replace the acceleration accumulator with this tick's steering.
    fn flock(&mut self, neighbors: &[&Agent], ctx: &SteeringContext);

    /// Integrate the accumulated acceleration. Leaves acceleration at zero.
    fn update(&mut self);

    /// Post-integration boundary handling for the active policy.
    fn apply_boundary(&mut self, ctx: &SteeringContext);

    /// Perception pre-filter for a raw query hit.
    #[must_use]
    fn perceives(&self, other: &Agent) -> bool;
}

impl FlockingLogic for Agent {
    fn steering(&self, neighbors: &[&Agent], ctx: &SteeringContext) -> Vector2 {
        let w = &ctx.weights;
        let mut total = Vector2::ZERO;

        // A component with a zero weight is skipped, not computed and scaled.
        if w.alignment > 0.0 {
            total += steering::alignment(self, neighbors) * w.alignment;
        }
        if w.cohesion > 0.0 {
            total += steering::cohesion(self, neighbors) * w.cohesion;
        }
        if w.separation > 0.0 {
            total += steering::separation(self, neighbors) * w.separation;
            if !self.is_predator {
                total += steering::predator_avoidance(self, neighbors) * w.separation;
            }
        }
        if ctx.boundary == BoundaryPolicy::Avoid {
            let intensity = w.mean();
            if intensity > 0.0 {
                total += steering::edge_avoidance(self, &ctx.bounds) * intensity;
            }
        }
        total
    }

    fn flock(&mut self, neighbors: &[&Agent], ctx: &SteeringContext) {
        self.acceleration = Vector2::ZERO;
        self.acceleration += self.steering(neighbors, ctx);
    }

    fn update(&mut self) {
        integration::sanitize(self);
        integration::integrate(self);
    }

    fn apply_boundary(&mut self, ctx: &SteeringContext) {
        match ctx.boundary {
            BoundaryPolicy::Avoid => {}
            BoundaryPolicy::Wrap => boundary::wrap(self, &ctx.bounds),
        }
    }

    fn perceives(&self, other: &Agent) -> bool {
        perception::in_view(self, other.position)
    }
}
