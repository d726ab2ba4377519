//! Error types for construction and stepping.

use skirmish_grid::GridError;
use thiserror::Error;

use crate::agent::UnitKind;

/// Invalid battle configuration. Raised by [`Simulation::new`](crate::Simulation::new)
/// before any agent is placed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Width or height is zero or too large.
    #[error("invalid battlefield dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// A force would start dead or with a non-finite health.
    #[error("{kind} force has invalid starting health {health}")]
    InvalidHealth {
        /// Offending force
        kind: UnitKind,
        /// Requested health
        health: f64,
    },
    /// A force has negative or non-finite attack power.
    #[error("{kind} force has invalid attack power {power}")]
    InvalidPower {
        /// Offending force
        kind: UnitKind,
        /// Requested power
        power: f64,
    },
    /// Initial placement failed.
    #[error("deployment failed: {0}")]
    Deployment(#[from] GridError),
}

/// Failure while advancing the simulation.
///
/// The movement rules never step outside the grid, so any of these during a
/// tick points at a bug rather than at bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A grid update was rejected.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
