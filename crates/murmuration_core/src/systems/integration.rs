use murmuration_data::{Agent, Vector2};
use std::mem;

/// Advance one agent by one tick.
///
/// The accumulated acceleration is consumed, so it is zero again once this
/// returns. The velocity is updated first and clamped to `max_speed`, then
/// the position moves by the new velocity.
pub fn integrate(agent: &mut Agent) {
    let acceleration = mem::take(&mut agent.acceleration);
    agent.velocity = (agent.velocity + acceleration).limit(agent.params.max_speed);
    agent.position += agent.velocity;
}

/// Zero any non-finite component so one bad input cannot poison the flock.
pub fn sanitize(agent: &mut Agent) {
    if !agent.velocity.is_finite() {
        agent.velocity = Vector2::ZERO;
    }
    if !agent.acceleration.is_finite() {
        agent.acceleration = Vector2::ZERO;
    }
}
