//! Error types for the simulation core.
//!
//! Only configuration loading and the domain invariant of the region tree
//! can fail. Malformed forces and points without a particle are tolerated
//! where they occur and never surface here.

use crate::types::ParticleId;
use glam::DVec2;
use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// A live particle could not be inserted into the region tree, i.e. its
    /// position left the world domain despite the toroidal wrap.
    OutOfDomain {
        particle: ParticleId,
        position: DVec2,
    },
    /// A tick was requested with a negative or non-finite time step.
    InvalidTimestep(f64),
    /// Failed to read a configuration file.
    Io(std::io::Error),
    /// Failed to parse or emit YAML.
    Yaml(serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimError::OutOfDomain { particle, position } => write!(
                f,
                "Particle {} at ({}, {}) lies outside the world boundary",
                particle, position.x, position.y
            ),
            SimError::InvalidTimestep(dt) => write!(f, "Invalid time step: {}", dt),
            SimError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            SimError::Yaml(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(e: serde_yaml::Error) -> Self {
        SimError::Yaml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn out_of_domain_message_names_particle() {
        let err = SimError::OutOfDomain {
            particle: 7,
            position: DVec2::new(-1.0, 2.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("Particle 7"), "{msg}");
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_keeps_source() {
        let err: SimError = std::io::Error::new(std::io::ErrorKind::NotFound, "nope").into();
        assert!(err.source().is_some());
    }
}
