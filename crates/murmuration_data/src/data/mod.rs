//! Core data structures for the Murmuration simulation.

pub mod agent;
pub mod vector;
pub mod world;
