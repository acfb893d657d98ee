use murmuration_data::{Agent, Vector2};
use std::f64::consts::FRAC_PI_2;

/// Half-width, in radians, of an agent's forward perception window.
///
/// Never wider than 90 degrees: anything strictly behind the agent is out
/// of view whatever the configured angle.
pub fn half_window(perception_angle_deg: f64) -> f64 {
    (perception_angle_deg.to_radians() * 0.5).clamp(0.0, FRAC_PI_2)
}

/// Whether `target` lies inside `agent`'s perception window.
///
/// Agents without a configured window see all around. A stationary agent
/// has no heading and sees everything, as does a target at its own
/// position.
pub fn in_view(agent: &Agent, target: Vector2) -> bool {
    let Some(angle) = agent.params.perception_angle else {
        return true;
    };
    match agent.velocity.angle_between(target - agent.position) {
        Some(bearing) => bearing <= half_window(angle),
        None => true,
    }
}
