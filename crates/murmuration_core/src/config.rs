//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto a `config.toml` file. Every field
//! has a default, so a file only needs the values it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1000.0
//! height = 600.0
//! seed = 42
//! boundary = "wrap"
//!
//! [index]
//! capacity = 4
//!
//! [weights]
//! alignment = 1.0
//! cohesion = 1.0
//! separation = 1.0
//!
//! [population]
//! initial_prey = 300
//! initial_predators = 3
//! ```

use crate::geometry::Rectangle;
use murmuration_data::{BehaviorParams, BoundaryPolicy, FlockingWeights, NeighborFilter, WorldBounds};
use serde::{Deserialize, Serialize};

/// World extent, boundary handling and RNG seeding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Seeds the ChaCha8 RNG. Same seed and config replay the same run.
    pub seed: Option<u64>,
    pub boundary: BoundaryPolicy,
    pub neighbor_filter: NeighborFilter,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            seed: None,
            boundary: BoundaryPolicy::Avoid,
            neighbor_filter: NeighborFilter::All,
        }
    }
}

/// Spatial index tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Points a leaf holds before it subdivides.
    pub capacity: usize,
    /// Leaves at this depth never subdivide, so coincident points terminate.
    pub max_depth: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            max_depth: 12,
        }
    }
}

/// Initial population and periodic spawning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial_prey: usize,
    pub initial_predators: usize,
    /// Number of distinct prey flocks; each gets its own color.
    pub flock_count: u32,
    /// Ticks between spawned prey. Zero disables spawning.
    pub spawn_interval: u64,
    pub max_population: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_prey: 200,
            initial_predators: 0,
            flock_count: 3,
            spawn_interval: 10,
            max_population: 500,
        }
    }
}

/// Root configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub index: IndexConfig,
    pub prey: BehaviorParams,
    pub predator: BehaviorParams,
    pub weights: FlockingWeights,
    pub population: PopulationConfig,
    /// Ticks between info-level metric summaries.
    pub log_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            index: IndexConfig::default(),
            prey: BehaviorParams::default(),
            predator: BehaviorParams {
                max_speed: 4.5,
                predator_speed_multiplier: None,
                ..BehaviorParams::default()
            },
            weights: FlockingWeights::default(),
            population: PopulationConfig::default(),
            log_interval: 1000,
        }
    }
}

fn validate_params(name: &str, params: &BehaviorParams) -> anyhow::Result<()> {
    anyhow::ensure!(
        params.max_speed.is_finite() && params.max_speed >= 0.0,
        "{name}: max speed must be non-negative"
    );
    anyhow::ensure!(
        params.max_force.is_finite() && params.max_force >= 0.0,
        "{name}: max force must be non-negative"
    );
    anyhow::ensure!(
        params.neighbor_radius.is_finite() && params.neighbor_radius >= 0.0,
        "{name}: neighbor radius must be non-negative"
    );
    anyhow::ensure!(
        params.edge_margin.is_finite() && params.edge_margin >= 0.0,
        "{name}: edge margin must be non-negative"
    );
    if let Some(angle) = params.perception_angle {
        anyhow::ensure!(
            angle > 0.0 && angle <= 360.0,
            "{name}: perception angle must be in (0, 360]"
        );
    }
    if let Some(multiplier) = params.predator_speed_multiplier {
        anyhow::ensure!(
            multiplier.is_finite() && multiplier >= 1.0,
            "{name}: predator speed multiplier must be at least 1.0"
        );
    }
    Ok(())
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(
            self.world.width.is_finite() && self.world.width > 0.0,
            "World width must be positive"
        );
        anyhow::ensure!(
            self.world.height.is_finite() && self.world.height > 0.0,
            "World height must be positive"
        );

        // Index validation
        anyhow::ensure!(self.index.capacity > 0, "Index capacity must be positive");
        anyhow::ensure!(
            self.index.max_depth > 0 && self.index.max_depth <= 32,
            "Index max depth must be in [1, 32]"
        );

        validate_params("prey", &self.prey)?;
        validate_params("predator", &self.predator)?;

        // Weights validation
        let w = &self.weights;
        for (name, value) in [
            ("alignment", w.alignment),
            ("cohesion", w.cohesion),
            ("separation", w.separation),
        ] {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "Weight {name} must be non-negative"
            );
        }

        // Population validation
        let pop = &self.population;
        anyhow::ensure!(
            pop.flock_count > 0
                || (pop.initial_prey + pop.initial_predators == 0 && pop.spawn_interval == 0),
            "Flock count must be positive when agents are spawned"
        );
        anyhow::ensure!(
            pop.initial_prey + pop.initial_predators <= pop.max_population,
            "Initial population exceeds max population"
        );

        anyhow::ensure!(self.log_interval > 0, "Log interval must be positive");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world.width, self.world.height)
    }

    /// The index root: the whole world, edges included.
    #[must_use]
    pub fn world_rect(&self) -> Rectangle {
        Rectangle::from_extent(self.world.width, self.world.height)
    }

    /// Digest of every behavior-relevant section. Two runs with the same
    /// fingerprint and seed produce the same trajectories.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.index).as_bytes());
        hasher.update(format!("{:?}", self.prey).as_bytes());
        hasher.update(format!("{:?}", self.predator).as_bytes());
        hasher.update(format!("{:?}", self.weights).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = AppConfig {
            world: WorldConfig {
                width: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = AppConfig {
            index: IndexConfig {
                capacity: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = AppConfig {
            weights: FlockingWeights::new(1.0, -0.5, 1.0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cohesion"));
    }

    #[test]
    fn test_perception_angle_range() {
        let mut config = AppConfig::default();
        config.prey.perception_angle = Some(270.0);
        assert!(config.validate().is_ok());
        config.prey.perception_angle = Some(0.0);
        assert!(config.validate().is_err());
        config.prey.perception_angle = Some(400.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let mut config = AppConfig::default();
        config.prey.predator_speed_multiplier = Some(0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_alone_enables_replay() {
        let config = AppConfig::from_toml("[world]\nseed = 7\n").unwrap();
        assert_eq!(config.world.seed, Some(7));
        assert!(AppConfig::default().world.seed.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 400.0
            boundary = "wrap"
            neighbor_filter = "same_flock"

            [weights]
            separation = 2.0

            [prey]
            perception_angle = 120.0
            "#,
        )
        .unwrap();
        assert_eq!(config.world.width, 400.0);
        assert_eq!(config.world.height, 600.0);
        assert_eq!(config.world.boundary, BoundaryPolicy::Wrap);
        assert_eq!(config.world.neighbor_filter, NeighborFilter::SameFlock);
        assert_eq!(config.weights.separation, 2.0);
        assert_eq!(config.weights.alignment, 1.0);
        assert_eq!(config.prey.perception_angle, Some(120.0));
        assert_eq!(config.prey.max_speed, 4.0);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        assert!(AppConfig::from_toml("[index]\ncapacity = 0\n").is_err());
        assert!(AppConfig::from_toml("[world]\nwidth = \"wide\"\n").is_err());
    }

    #[test]
    fn test_fingerprint_tracks_behavior() {
        let a = AppConfig::default();
        let mut b = AppConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.weights.cohesion = 0.25;
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_world_rect_covers_bounds() {
        let config = AppConfig::default();
        let rect = config.world_rect();
        assert_eq!(rect.left(), 0.0);
        assert_eq!(rect.right(), 1000.0);
        assert_eq!(rect.bottom(), 600.0);
    }
}
