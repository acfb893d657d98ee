//! # Murmuration Core
//!
//! The simulation engine for Murmuration - a boids flocking simulation
//! with predators, built around a per-tick region quadtree.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Range shapes and the arena quadtree used for neighbor queries
//! - Flocking rules, perception filtering and steering components
//! - The tick driver (Clear, Rebuild, Steer, Integrate)
//! - Seeded population spawning
//! - Flat render buffers and the partition overlay
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use murmuration_core::config::AppConfig;
//! use murmuration_core::simulation::Simulation;
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(42);
//! config.population.initial_prey = 50;
//!
//! let mut sim = Simulation::new(config).unwrap();
//! sim.tick();
//! assert_eq!(sim.tick_count(), 1);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Error types for host-facing operations
pub mod error;
/// Rectangle and circle range shapes
pub mod geometry;
/// Seeded agent creation
pub mod lifecycle;
/// Tick metrics and structured logging
pub mod metrics;
/// Region quadtree over agent indices
pub mod quadtree;
/// The tick driver
pub mod simulation;
/// Flat buffers for renderers and external kernels
pub mod snapshot;
/// Per-agent flocking systems
pub mod systems;

pub use config::AppConfig;
pub use error::SimError;
#[cfg(not(target_arch = "wasm32"))]
pub use metrics::init_logging;
pub use metrics::Metrics;
pub use simulation::Simulation;
pub use systems::{FlockingLogic, SteeringContext};
