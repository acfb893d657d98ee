use murmuration_data::{Agent, WorldBounds};

/// Teleport an agent that left the world to the opposite edge.
///
/// Each axis is handled independently. Positions exactly on an edge are
/// inside and stay put.
pub fn wrap(agent: &mut Agent, bounds: &WorldBounds) {
    let pos = &mut agent.position;
    if pos.x < 0.0 {
        pos.x = bounds.width;
    } else if pos.x > bounds.width {
        pos.x = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = bounds.height;
    } else if pos.y > bounds.height {
        pos.y = 0.0;
    }
}
