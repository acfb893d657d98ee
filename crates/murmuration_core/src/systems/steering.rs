//! Steering components.
//!
//! Each component averages a per-neighbor contribution, turns the average
//! into a desired velocity at a target speed, subtracts the current
//! velocity and clamps the result to the agent's force cap. A component
//! with no contributing neighbors (or a zero average) is the zero vector.

use super::rules;
use murmuration_data::{Agent, Vector2, WorldBounds};

/// Edge avoidance force cap relative to `max_force`.
pub const EDGE_FORCE_FACTOR: f64 = 0.75;

/// Steering delta from `velocity` toward `direction` at `speed`.
pub fn steer(direction: Vector2, speed: f64, velocity: Vector2, max_force: f64) -> Vector2 {
    if direction.is_zero() {
        return Vector2::ZERO;
    }
    (direction.set_magnitude(speed) - velocity).limit(max_force)
}

#[inline]
fn in_reach(agent: &Agent, other: &Agent) -> bool {
    agent.position.distance(other.position) <= agent.params.neighbor_radius
}

/// Steer toward the average velocity of flockmates.
pub fn alignment(agent: &Agent, neighbors: &[&Agent]) -> Vector2 {
    let mut sum = Vector2::ZERO;
    let mut count = 0usize;
    for &other in neighbors {
        if rules::should_align(agent, other) && in_reach(agent, other) {
            sum += other.velocity;
            count += 1;
        }
    }
    if count == 0 {
        return Vector2::ZERO;
    }
    let p = &agent.params;
    steer(sum / count as f64, p.max_speed, agent.velocity, p.max_force)
}

/// Steer toward the average position of flockmates.
pub fn cohesion(agent: &Agent, neighbors: &[&Agent]) -> Vector2 {
    let mut sum = Vector2::ZERO;
    let mut count = 0usize;
    for &other in neighbors {
        if rules::should_cohere(agent, other) && in_reach(agent, other) {
            sum += other.position;
            count += 1;
        }
    }
    if count == 0 {
        return Vector2::ZERO;
    }
    let p = &agent.params;
    let toward = sum / count as f64 - agent.position;
    steer(toward, p.max_speed, agent.velocity, p.max_force)
}

/// Inverse-distance repulsion sum over neighbors accepted by `accept`.
fn repulsion<F>(agent: &Agent, neighbors: &[&Agent], accept: F) -> Option<Vector2>
where
    F: Fn(&Agent, &Agent) -> bool,
{
    let mut sum = Vector2::ZERO;
    let mut count = 0usize;
    for &other in neighbors {
        if !accept(agent, other) {
            continue;
        }
        let away = agent.position - other.position;
        let distance = away.magnitude();
        if distance > 0.0 && distance <= agent.params.neighbor_radius {
            sum += away / distance;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Keep local spacing from agents of the same kind.
pub fn separation(agent: &Agent, neighbors: &[&Agent]) -> Vector2 {
    let p = &agent.params;
    repulsion(agent, neighbors, rules::should_separate)
        .map_or(Vector2::ZERO, |away| {
            steer(away, p.max_speed, agent.velocity, p.max_force)
        })
}

/// Prey fleeing predators, at a boosted desired speed.
///
/// Only the desired velocity is boosted; the force cap and the speed cap
/// applied at integration are unchanged.
pub fn predator_avoidance(agent: &Agent, neighbors: &[&Agent]) -> Vector2 {
    let p = &agent.params;
    let speed = p.max_speed * p.flee_multiplier();
    repulsion(agent, neighbors, rules::should_flee)
        .map_or(Vector2::ZERO, |away| {
            steer(away, speed, agent.velocity, p.max_force)
        })
}

/// Push back from any world edge closer than `edge_margin`.
///
/// The push from each edge grows linearly as the agent gets closer, so an
/// agent outside the world is pushed hardest. The combined push is steered
/// with a reduced force cap.
pub fn edge_avoidance(agent: &Agent, bounds: &WorldBounds) -> Vector2 {
    let p = &agent.params;
    let margin = p.edge_margin;
    let pos = agent.position;
    let mut push = Vector2::ZERO;

    let left = pos.x;
    if left <= margin {
        push.x += margin - left;
    }
    let right = bounds.width - pos.x;
    if right <= margin {
        push.x -= margin - right;
    }
    let top = pos.y;
    if top <= margin {
        push.y += margin - top;
    }
    let bottom = bounds.height - pos.y;
    if bottom <= margin {
        push.y -= margin - bottom;
    }

    steer(
        push,
        p.max_speed,
        agent.velocity,
        p.max_force * EDGE_FORCE_FACTOR,
    )
}
