//! Agent creation: seeded random placement, heading and coloring.

use crate::config::AppConfig;
use murmuration_data::{Agent, Appearance, BehaviorParams, FlockId, Vector2, WorldBounds};
use rand::Rng;
use std::f64::consts::TAU;

/// Initial speed range of a freshly spawned agent.
pub const MIN_INITIAL_SPEED: f64 = 0.5;
pub const MAX_INITIAL_SPEED: f64 = 2.0;

pub const PREDATOR_APPEARANCE: Appearance = Appearance { r: 230, g: 40, b: 40 };

/// Random heading with a speed in `[MIN_INITIAL_SPEED, MAX_INITIAL_SPEED)`.
pub fn random_velocity<R: Rng>(rng: &mut R) -> Vector2 {
    let heading = rng.gen_range(0.0..TAU);
    Vector2::from_angle(heading) * rng.gen_range(MIN_INITIAL_SPEED..MAX_INITIAL_SPEED)
}

pub fn random_position<R: Rng>(rng: &mut R, bounds: &WorldBounds) -> Vector2 {
    Vector2::new(
        rng.gen_range(0.0..=bounds.width),
        rng.gen_range(0.0..=bounds.height),
    )
}

pub fn random_appearance<R: Rng>(rng: &mut R) -> Appearance {
    Appearance {
        r: rng.gen(),
        g: rng.gen(),
        b: rng.gen(),
    }
}

/// One color per flock id.
pub fn flock_palette<R: Rng>(rng: &mut R, flock_count: u32) -> Vec<Appearance> {
    (0..flock_count).map(|_| random_appearance(rng)).collect()
}

pub fn create_prey_with_rng<R: Rng>(
    rng: &mut R,
    bounds: &WorldBounds,
    flock_id: FlockId,
    params: BehaviorParams,
    appearance: Appearance,
) -> Agent {
    Agent::new(random_position(rng, bounds), random_velocity(rng), flock_id)
        .with_params(params)
        .with_appearance(appearance)
}

pub fn create_predator_with_rng<R: Rng>(
    rng: &mut R,
    bounds: &WorldBounds,
    flock_id: FlockId,
    params: BehaviorParams,
) -> Agent {
    Agent::predator(random_position(rng, bounds), random_velocity(rng), flock_id)
        .with_params(params)
        .with_appearance(PREDATOR_APPEARANCE)
}

/// Builds the initial population described by `config.population`.
///
/// Prey are dealt round-robin across flocks. Predators take their own flock
/// ids after the prey flocks so that predators of different packs align.
pub fn populate<R: Rng>(config: &AppConfig, palette: &[Appearance], rng: &mut R) -> Vec<Agent> {
    let pop = &config.population;
    let bounds = config.bounds();
    let flocks = pop.flock_count.max(1);
    let mut agents = Vec::with_capacity(pop.initial_prey + pop.initial_predators);

    for i in 0..pop.initial_prey {
        let flock_id = (i as u32) % flocks;
        let appearance = palette
            .get(flock_id as usize)
            .copied()
            .unwrap_or_default();
        agents.push(create_prey_with_rng(
            rng,
            &bounds,
            flock_id,
            config.prey,
            appearance,
        ));
    }
    for i in 0..pop.initial_predators {
        let flock_id = flocks + i as u32;
        agents.push(create_predator_with_rng(
            rng,
            &bounds,
            flock_id,
            config.predator,
        ));
    }
    agents
}
