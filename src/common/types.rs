//! Common types used throughout dp_poly_path

use nalgebra::Vector2;
use std::f64::consts::PI;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Point in the station-lateral (Frenet) frame of a reference line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SLPoint {
    /// Arc length along the reference line [m]
    pub s: f64,
    /// Signed lateral offset, positive to the left [m]
    pub l: f64,
}

impl SLPoint {
    pub fn new(s: f64, l: f64) -> Self {
        Self { s, l }
    }
}

/// Sample of the reference line at a given station
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
    /// Tangent heading [rad]
    pub heading: f64,
    /// Signed curvature [1/m]
    pub kappa: f64,
}

impl ReferencePoint {
    pub fn new(x: f64, y: f64, heading: f64, kappa: f64) -> Self {
        Self { x, y, heading, kappa }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Predicted obstacle pose at a time relative to the planning cycle start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    /// Time relative to the start of the prediction [s]
    pub relative_time: f64,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, heading: f64, relative_time: f64) -> Self {
        Self { x, y, heading, relative_time }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Normalize angle to [-PI, PI)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = (angle + PI).rem_euclid(2.0 * PI);
    a - PI
}
