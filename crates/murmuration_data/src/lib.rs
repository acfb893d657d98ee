//! Plain data shared between the simulation core and its hosts.

pub mod data;

pub use data::agent::{Agent, Appearance, BehaviorParams, FlockId};
pub use data::vector::Vector2;
pub use data::world::{BoundaryPolicy, FlockingWeights, NeighborFilter, WorldBounds};
