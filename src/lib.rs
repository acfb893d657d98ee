//! # Murmuration
//!
//! Host-side crate: the headless runner, re-exports of the simulation
//! model and, on wasm32, the browser bridge.

pub mod app;
pub mod model;

#[cfg(target_arch = "wasm32")]
pub mod web;
