//! DP Poly Path Trajectory Cost Module
//!
//! This module scores lateral candidate curves produced by a dynamic
//! programming path search over a lattice of station/lateral samples.
//! Each candidate gets a scalar cost used to rank it against the others.
//!
//! # Components
//!
//! - `config`: Cost weights, sampling steps and distance thresholds
//! - `footprint_cache`: Per-cycle predicted obstacle boxes by time index
//! - `trajectory_cost`: Path-shape and obstacle-interaction cost
//! - `quintic_curve`, `reference_line`, `speed_data`, `obstacle`:
//!   Default implementations of the collaborator traits
//!
//! # Example
//!
//! ```no_run
//! use dp_poly_path::common::SLPoint;
//! use dp_poly_path::path_planning::dp_poly_path::*;
//!
//! let config = DpPolyPathConfig::default();
//! let line = ReferenceLine::new(&[0.0, 50.0, 100.0], &[0.0, 5.0, 0.0]).unwrap();
//! let speed = SpeedData::constant_speed(10.0, 8.0, 0.1).unwrap();
//! let obstacles: Vec<PredictedObstacle> = Vec::new();
//!
//! // Once per planning cycle
//! let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();
//! let cost = TrajectoryCost::new(
//!     &config, &line, &cache, VehicleParam::default(), &speed, SLPoint::default(),
//! ).unwrap();
//!
//! // Once per candidate
//! let curve = QuinticPolynomialCurve1d::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 20.0).unwrap();
//! let total = cost.calculate(&curve, 0.0, 20.0).unwrap();
//! ```

pub mod config;
pub mod footprint_cache;
pub mod obstacle;
pub mod quintic_curve;
pub mod reference_line;
pub mod speed_data;
pub mod trajectory_cost;

// Re-exports
pub use config::{
    DpPolyPathConfig, VehicleParam, MAX_SAMPLES, MIN_EVAL_TIME_INTERVAL, MIN_PATH_RESOLUTION,
};
pub use footprint_cache::{num_time_stamps, planning_horizon, FootprintCache, ObstacleFootprint};
pub use obstacle::PredictedObstacle;
pub use quintic_curve::QuinticPolynomialCurve1d;
pub use reference_line::ReferenceLine;
pub use speed_data::{SpeedData, SpeedPoint};
pub use trajectory_cost::{ComponentCost, TrajectoryCost};
