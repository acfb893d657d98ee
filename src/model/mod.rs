pub use murmuration_core::{FlockingLogic, SteeringContext};
pub use murmuration_data::{
    Agent, Appearance, BehaviorParams, BoundaryPolicy, FlockId, FlockingWeights, NeighborFilter,
    Vector2, WorldBounds,
};
pub mod config {
    pub use murmuration_core::config::*;
}
pub mod geometry {
    pub use murmuration_core::geometry::*;
}
pub mod quadtree {
    pub use murmuration_core::quadtree::*;
}
pub mod lifecycle {
    pub use murmuration_core::lifecycle::*;
}
pub mod metrics {
    pub use murmuration_core::metrics::*;
}
pub mod simulation {
    pub use murmuration_core::simulation::*;
}
pub mod snapshot {
    pub use murmuration_core::snapshot::*;
}
pub mod systems {
    pub use murmuration_core::systems::*;
}
pub mod error {
    pub use murmuration_core::error::*;
}
