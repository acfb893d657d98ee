use murmuration_lib::model::config::AppConfig;
use murmuration_lib::model::simulation::Simulation;
use murmuration_lib::model::{
    Agent, BehaviorParams, BoundaryPolicy, FlockId, FlockingWeights, NeighborFilter, Vector2,
};

#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    agents: Vec<Agent>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    /// Empty 1000x600 world, no random population, no periodic spawning.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(0);
        config.population.initial_prey = 0;
        config.population.initial_predators = 0;
        config.population.spawn_interval = 0;
        Self {
            config,
            agents: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_weights(mut self, alignment: f64, cohesion: f64, separation: f64) -> Self {
        self.config.weights = FlockingWeights::new(alignment, cohesion, separation);
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.config.world.boundary = boundary;
        self
    }

    pub fn with_filter(mut self, filter: NeighborFilter) -> Self {
        self.config.world.neighbor_filter = filter;
        self
    }

    pub fn with_world(mut self, width: f64, height: f64) -> Self {
        self.config.world.width = width;
        self.config.world.height = height;
        self
    }

    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> Simulation {
        Simulation::with_agents(self.config, self.agents)
            .expect("Failed to create simulation in test builder")
    }
}

#[allow(dead_code)]
pub struct AgentBuilder {
    position: Vector2,
    velocity: Vector2,
    flock_id: FlockId,
    is_predator: bool,
    params: BehaviorParams,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            position: Vector2::new(500.0, 300.0),
            velocity: Vector2::ZERO,
            flock_id: 0,
            is_predator: false,
            params: BehaviorParams::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Vector2::new(x, y);
        self
    }

    pub fn velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Vector2::new(vx, vy);
        self
    }

    pub fn flock(mut self, id: FlockId) -> Self {
        self.flock_id = id;
        self
    }

    pub fn predator(mut self) -> Self {
        self.is_predator = true;
        self
    }

    pub fn max_speed(mut self, speed: f64) -> Self {
        self.params.max_speed = speed;
        self
    }

    pub fn max_force(mut self, force: f64) -> Self {
        self.params.max_force = force;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.params.neighbor_radius = radius;
        self
    }

    pub fn perception(mut self, degrees: f64) -> Self {
        self.params.perception_angle = Some(degrees);
        self
    }

    pub fn flee_multiplier(mut self, multiplier: f64) -> Self {
        self.params.predator_speed_multiplier = Some(multiplier);
        self
    }

    pub fn build(self) -> Agent {
        let agent = if self.is_predator {
            Agent::predator(self.position, self.velocity, self.flock_id)
        } else {
            Agent::new(self.position, self.velocity, self.flock_id)
        };
        agent.with_params(self.params)
    }
}
