//! Browser bridge. A canvas host drives one simulation through typed arrays.

use crate::model::config::AppConfig;
use crate::model::simulation::Simulation;
use crate::model::snapshot::RenderSnapshot;
use crate::model::{BehaviorParams, FlockingWeights, Vector2};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
    /// Render buffers for the current frame, refreshed after every change.
    frame: RenderSnapshot,
}

#[wasm_bindgen]
impl WebSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        population: usize,
        predators: usize,
        seed: Option<u32>,
    ) -> Result<WebSimulation, JsValue> {
        console_error_panic_hook::set_once();

        let mut config = AppConfig::default();
        config.world.width = width;
        config.world.height = height;
        config.world.seed = seed.map(u64::from);
        config.population.initial_prey = population;
        config.population.initial_predators = predators;
        config.population.max_population = config
            .population
            .max_population
            .max(population + predators);

        let sim = Simulation::new(config).map_err(js_err)?;
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "murmuration: {} agents on {}x{}",
            sim.len(),
            width,
            height
        )));
        let frame = sim.snapshot();
        Ok(WebSimulation { sim, frame })
    }

    /// Advances one frame with the slider weights.
    pub fn tick(&mut self, alignment: f64, cohesion: f64, separation: f64) {
        let weights = FlockingWeights::new(alignment.max(0.0), cohesion.max(0.0), separation.max(0.0));
        self.sim.set_weights(weights);
        self.sim.tick();
        self.sim.snapshot_into(&mut self.frame);
    }

    /// Applies the behavior sliders to every prey agent.
    pub fn set_behavior(&mut self, max_speed: f64, max_distance: f64, max_edge_distance: f64, max_force: f64) {
        let params = BehaviorParams {
            max_speed: max_speed.max(0.0),
            neighbor_radius: max_distance.max(0.0),
            edge_margin: max_edge_distance.max(0.0),
            max_force: max_force.max(0.0),
            ..self.sim.config().prey
        };
        self.sim.set_prey_params(params);
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.sim.resize(width, height).map_err(js_err)
    }

    /// Click-to-add: a new flock scattered around `(x, y)`. Returns the new
    /// population size.
    pub fn spawn_burst(&mut self, x: f64, y: f64, count: usize, spread: f64) -> Result<usize, JsValue> {
        self.sim
            .spawn_burst(Vector2::new(x, y), count, spread)
            .map_err(js_err)?;
        self.sim.snapshot_into(&mut self.frame);
        Ok(self.sim.len())
    }

    pub fn count(&self) -> usize {
        self.sim.len()
    }

    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.frame.positions.as_slice())
    }

    pub fn velocities(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.frame.velocities.as_slice())
    }

    pub fn colors(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.frame.colors.as_slice())
    }

    /// Quadtree overlay as `(x, y, w, h)` quads.
    pub fn partition(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.sim.partition_snapshot().rects.as_slice())
    }

    /// Indices agent `i` currently perceives, for the perception overlay.
    pub fn neighbors_of(&self, i: usize) -> Result<js_sys::Uint32Array, JsValue> {
        let hits = self.sim.neighbors_of(i).map_err(js_err)?;
        let hits: Vec<u32> = hits.into_iter().map(|j| j as u32).collect();
        Ok(js_sys::Uint32Array::from(hits.as_slice()))
    }

    /// Imports positions and velocities computed by an external kernel.
    pub fn load_kinematics(&mut self, positions: &[f32], velocities: &[f32]) -> Result<(), JsValue> {
        self.sim
            .read_kinematics(positions, velocities)
            .map_err(js_err)?;
        self.sim.snapshot_into(&mut self.frame);
        Ok(())
    }

    pub fn get_stats(&self) -> js_sys::Object {
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(
            &obj,
            &JsValue::from_str("tick"),
            &JsValue::from_f64(self.sim.tick_count() as f64),
        );
        let _ = js_sys::Reflect::set(
            &obj,
            &JsValue::from_str("agents"),
            &JsValue::from_f64(self.sim.len() as f64),
        );
        let _ = js_sys::Reflect::set(
            &obj,
            &JsValue::from_str("nodes"),
            &JsValue::from_f64(self.sim.index().node_count() as f64),
        );
        obj
    }
}
