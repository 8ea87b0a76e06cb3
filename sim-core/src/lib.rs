//! Core of a 2-D short-range attraction simulation.
//!
//! Main components:
//! - [`geometry`]: rectangle and circle shapes used as boundaries and query ranges.
//! - [`region_tree`]: arena-backed quadtree over points with particle payloads.
//! - [`particle`]: point masses, pairwise attraction, integration and wrap.
//! - [`force`]: validated force vectors.
//! - [`trail`]: bounded position history with break markers.
//! - [`force_buffer`]: per-particle force accumulators for one tick.
//! - [`phases`]: the ordered per-tick phases.
//! - [`simulation`]: owns the state and runs ticks.
//! - [`config`]: simulation-wide constants and YAML loading.
//! - [`error`]: error type.
//! - [`types`]: shared id aliases.

pub mod config;
pub mod error;
pub mod force;
pub mod force_buffer;
pub mod geometry;
pub mod particle;
pub mod phases;
pub mod region_tree;
pub mod simulation;
pub mod trail;
pub mod types;

pub use config::Config;
pub use error::{Result, SimError};
pub use simulation::{Simulation, TickStats};
