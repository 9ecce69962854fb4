//! Engine errors

use thiserror::Error;

use crate::atlas::AtlasError;
use crate::config::ConfigError;

/// Errors that keep the engine from starting
///
/// None of these are fatal to the host: a host that gets one simply never
/// starts its tick loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host has no drawable area
    #[error("no render surface available (viewport {width}x{height})")]
    MissingSurface {
        /// Reported viewport width
        width: f32,
        /// Reported viewport height
        height: f32,
    },

    /// The configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A sprite atlas could not be generated
    #[error(transparent)]
    Atlas(#[from] AtlasError),
}
