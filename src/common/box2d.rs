//! Oriented bounding box used as the collision proxy for ego and obstacles.
//!
//! Overlap uses the separating axis theorem; the distance between two
//! disjoint boxes is attained between a corner of one box and an edge
//! of the other.

use nalgebra::Vector2;

use crate::common::types::Point2D;

/// Rectangle with center, heading, length (along heading) and width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2d {
    center: Point2D,
    heading: f64,
    length: f64,
    width: f64,
    cos_heading: f64,
    sin_heading: f64,
}

impl Box2d {
    pub fn new(center: Point2D, heading: f64, length: f64, width: f64) -> Self {
        Self {
            center,
            heading,
            length,
            width,
            cos_heading: heading.cos(),
            sin_heading: heading.sin(),
        }
    }

    pub fn center(&self) -> Point2D {
        self.center
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Corners in counter-clockwise order, starting rear-right
    pub fn corners(&self) -> [Point2D; 4] {
        const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let half_l = self.length / 2.0;
        let half_w = self.width / 2.0;
        let mut corners = [Point2D::origin(); 4];
        for (corner, &(sl, sw)) in corners.iter_mut().zip(SIGNS.iter()) {
            let dx = sl * half_l;
            let dy = sw * half_w;
            *corner = Point2D::new(
                self.center.x + dx * self.cos_heading - dy * self.sin_heading,
                self.center.y + dx * self.sin_heading + dy * self.cos_heading,
            );
        }
        corners
    }

    /// True if the point lies inside or on the boundary
    pub fn is_point_in(&self, point: &Point2D) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let lon = dx * self.cos_heading + dy * self.sin_heading;
        let lat = -dx * self.sin_heading + dy * self.cos_heading;
        lon.abs() <= self.length / 2.0 + 1e-9 && lat.abs() <= self.width / 2.0 + 1e-9
    }

    /// True if the two boxes intersect (touching counts as overlap)
    pub fn has_overlap(&self, other: &Box2d) -> bool {
        let a = self.corners();
        let b = other.corners();
        let axes = [
            Vector2::new(self.cos_heading, self.sin_heading),
            Vector2::new(-self.sin_heading, self.cos_heading),
            Vector2::new(other.cos_heading, other.sin_heading),
            Vector2::new(-other.sin_heading, other.cos_heading),
        ];
        axes.iter().all(|axis| {
            let (min_a, max_a) = project(&a, axis);
            let (min_b, max_b) = project(&b, axis);
            max_a >= min_b && max_b >= min_a
        })
    }

    /// Euclidean distance from a point to the box, 0 inside
    pub fn distance_to_point(&self, point: &Point2D) -> f64 {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let lon = (dx * self.cos_heading + dy * self.sin_heading).abs() - self.length / 2.0;
        let lat = (-dx * self.sin_heading + dy * self.cos_heading).abs() - self.width / 2.0;
        Vector2::new(lon.max(0.0), lat.max(0.0)).norm()
    }

    /// Minimum distance between the two boxes, 0 when they overlap
    pub fn distance_to(&self, other: &Box2d) -> f64 {
        if self.has_overlap(other) {
            return 0.0;
        }
        let from_self = self
            .corners()
            .iter()
            .map(|c| other.distance_to_point(c))
            .fold(f64::INFINITY, f64::min);
        let from_other = other
            .corners()
            .iter()
            .map(|c| self.distance_to_point(c))
            .fold(f64::INFINITY, f64::min);
        from_self.min(from_other)
    }
}

fn project(corners: &[Point2D; 4], axis: &Vector2<f64>) -> (f64, f64) {
    corners
        .iter()
        .map(|c| c.to_vector().dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)))
}
