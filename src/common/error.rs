//! Error types for dp_poly_path

use thiserror::Error;

/// Main error type for the path cost evaluation
#[derive(Error, Debug)]
pub enum PlanningError {
    /// Invalid configuration (non-positive step, misordered thresholds, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Station interval with `end_s <= start_s`
    #[error("Invalid station range: start_s = {start_s}, end_s = {end_s}")]
    InvalidRange { start_s: f64, end_s: f64 },

    /// Footprint cache and evaluator disagree on sampling
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    /// Malformed collaborator input (waypoints, speed points, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration document could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
