//! dp_poly_path - trajectory cost evaluation for DP lateral path search
//!
//! Candidate lateral curves are scored in the Frenet frame of a reference
//! line: a smoothness term on the lateral offset and its slope, plus a
//! distance-based term against the predicted footprints of obstacles.

// Core modules
pub mod common;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Box2d, Point2D, ReferencePoint, SLPoint, TrajectoryPoint};
pub use common::{Curve1d, ObstacleHandle, ReferenceGeometry, SpeedProfile};
pub use common::{PlanningError, PlanningResult};
