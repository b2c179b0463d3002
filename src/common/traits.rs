//! Collaborator interfaces consumed by the trajectory cost evaluator

use crate::common::box2d::Box2d;
use crate::common::types::*;

/// Road reference geometry in the station-lateral frame
pub trait ReferenceGeometry {
    /// Convert a station-lateral point to Cartesian coordinates
    fn sl_to_xy(&self, sl: &SLPoint) -> Point2D;

    /// Reference point (position, heading, curvature) at station `s`
    fn reference_point(&self, s: f64) -> ReferencePoint;
}

/// Longitudinal speed profile, station relative to the cycle start
pub trait SpeedProfile {
    /// Duration covered by the profile [s]
    fn total_time(&self) -> f64;

    /// Relative station reached at time `t`.
    ///
    /// Must be non-decreasing in `t`.
    fn evaluate_by_time(&self, t: f64) -> f64;
}

/// Scalar curve parameterised by arc-length offset
pub trait Curve1d {
    /// Value of the `order`-th derivative at `param`
    fn evaluate(&self, order: u32, param: f64) -> f64;

    /// Length of the parameter domain `[0, param_length]`
    fn param_length(&self) -> f64;
}

/// Obstacle as seen by the path cost evaluation
pub trait ObstacleHandle {
    /// Obstacle was marked as irrelevant by an upstream decider
    fn is_ignore(&self) -> bool;

    /// Planning-internal marker, not a physical obstacle
    fn is_virtual(&self) -> bool;

    /// Predicted pose at relative time `t`
    fn point_at_time(&self, t: f64) -> TrajectoryPoint;

    /// Footprint of the obstacle at a predicted pose
    fn bounding_box(&self, point: &TrajectoryPoint) -> Box2d;
}
