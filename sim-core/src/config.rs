//! Simulation-wide constants, loadable from YAML.
//!
//! Every field has a default, so a scenario file only needs the keys it
//! changes:
//!
//! ```yaml
//! particle_count: 2000
//! world_width: 1280.0
//! world_height: 720.0
//! gravity: 1.0
//! seed: 42
//! ```

use crate::error::{Result, SimError};
use crate::geometry::Rectangle;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub particle_count: usize,
    /// Gravitational constant `G`.
    pub gravity: f64,
    pub max_speed: f64,
    pub max_path_length: usize,
    /// Authoritative interaction cutoff distance.
    pub effective_range: f64,
    /// Broad-phase query circle radius. `None` uses `effective_range`.
    pub query_radius: Option<f64>,
    /// Distance floor substituted into the force law.
    pub softening: f64,
    pub world_width: f64,
    pub world_height: f64,
    /// Points a region-tree node holds before subdividing.
    pub node_capacity: usize,
    pub max_radius: f64,
    /// Radius is `sqrt(mass) * radius_scale`, capped at `max_radius`.
    pub radius_scale: f64,
    /// Side length of the spawn square centered on the world.
    pub spawn_spread: f64,
    pub mass_min: f64,
    pub mass_max: f64,
    /// Each initial velocity component is uniform in `[-initial_speed, initial_speed]`.
    pub initial_speed: f64,
    pub seed: Option<u64>,
    /// Run the force phase on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 50_000,
            gravity: 1.0,
            max_speed: 5.0,
            max_path_length: 5,
            effective_range: 500.0,
            query_radius: None,
            softening: 10.0,
            world_width: 6400.0,
            world_height: 3600.0,
            node_capacity: 1,
            max_radius: 5.0,
            radius_scale: 0.125,
            spawn_spread: 1000.0,
            mass_min: 150.0,
            mass_max: 400.0,
            initial_speed: 2.0,
            seed: None,
            parallel: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the numeric ranges the simulation relies on.
    ///
    /// ### Errors
    /// Returns [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {v}"
                )))
            }
        }

        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("max_speed", self.max_speed)?;
        positive("effective_range", self.effective_range)?;
        positive("softening", self.softening)?;
        positive("mass_min", self.mass_min)?;
        positive("mass_max", self.mass_max)?;
        positive("radius_scale", self.radius_scale)?;
        positive("max_radius", self.max_radius)?;
        if let Some(r) = self.query_radius {
            positive("query_radius", r)?;
        }

        if !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.spawn_spread.is_finite() && self.spawn_spread >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "spawn_spread must be non-negative, got {}",
                self.spawn_spread
            )));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "initial_speed must be non-negative, got {}",
                self.initial_speed
            )));
        }
        if self.mass_min > self.mass_max {
            return Err(SimError::InvalidConfig(format!(
                "mass_min ({}) exceeds mass_max ({})",
                self.mass_min, self.mass_max
            )));
        }
        if self.node_capacity == 0 {
            return Err(SimError::InvalidConfig("node_capacity must be at least 1".into()));
        }
        if self.max_path_length == 0 {
            return Err(SimError::InvalidConfig("max_path_length must be at least 1".into()));
        }
        Ok(())
    }

    pub fn effective_query_radius(&self) -> f64 {
        self.query_radius.unwrap_or(self.effective_range)
    }

    /// `true` when the broad phase can miss partners inside `effective_range`.
    pub fn query_narrower_than_range(&self) -> bool {
        self.effective_query_radius() < self.effective_range
    }

    pub fn world_size(&self) -> DVec2 {
        DVec2::new(self.world_width, self.world_height)
    }

    /// Root boundary covering exactly `[0, W] x [0, H]`.
    pub fn world_boundary(&self) -> Rectangle {
        Rectangle::from_min_max(DVec2::ZERO, self.world_size())
    }

    pub fn world_center(&self) -> DVec2 {
        self.world_size() * 0.5
    }
}
