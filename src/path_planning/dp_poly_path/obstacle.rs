//! Perception obstacle with a predicted trajectory

use crate::common::box2d::Box2d;
use crate::common::traits::ObstacleHandle;
use crate::common::types::{normalize_angle, Point2D, TrajectoryPoint};

#[derive(Debug, Clone)]
pub struct PredictedObstacle {
    id: String,
    length: f64,
    width: f64,
    /// Pose at t = 0, used when no prediction is available
    pose: TrajectoryPoint,
    trajectory: Vec<TrajectoryPoint>,
    ignore: bool,
    is_virtual: bool,
}

impl PredictedObstacle {
    /// Obstacle that stays at `pose` for the whole horizon
    pub fn new_static(
        id: impl Into<String>,
        pose: TrajectoryPoint,
        length: f64,
        width: f64,
    ) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            pose,
            trajectory: Vec::new(),
            ignore: false,
            is_virtual: false,
        }
    }

    /// Moving obstacle; points are sorted by relative time
    pub fn new_moving(
        id: impl Into<String>,
        mut trajectory: Vec<TrajectoryPoint>,
        length: f64,
        width: f64,
    ) -> Self {
        trajectory.sort_by(|a, b| {
            a.relative_time
                .partial_cmp(&b.relative_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let pose = trajectory
            .first()
            .copied()
            .unwrap_or_else(|| TrajectoryPoint::new(0.0, 0.0, 0.0, 0.0));
        Self {
            id: id.into(),
            length,
            width,
            pose,
            trajectory,
            ignore: false,
            is_virtual: false,
        }
    }

    /// Obstacle moving at constant velocity from `pose`, sampled every `dt`
    pub fn new_constant_velocity(
        id: impl Into<String>,
        pose: TrajectoryPoint,
        speed: f64,
        horizon: f64,
        dt: f64,
        length: f64,
        width: f64,
    ) -> Self {
        let n = if dt > 0.0 { (horizon / dt).ceil() as usize } else { 0 };
        let trajectory = (0..=n)
            .map(|i| {
                let t = i as f64 * dt;
                TrajectoryPoint::new(
                    pose.x + speed * t * pose.heading.cos(),
                    pose.y + speed * t * pose.heading.sin(),
                    pose.heading,
                    pose.relative_time + t,
                )
            })
            .collect();
        Self::new_moving(id, trajectory, length, width)
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_virtual(mut self, is_virtual: bool) -> Self {
        self.is_virtual = is_virtual;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }
}

impl ObstacleHandle for PredictedObstacle {
    fn is_ignore(&self) -> bool {
        self.ignore
    }

    fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    fn point_at_time(&self, t: f64) -> TrajectoryPoint {
        let (first, last) = match (self.trajectory.first(), self.trajectory.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return TrajectoryPoint { relative_time: t, ..self.pose },
        };
        if t <= first.relative_time {
            return first;
        }
        if t >= last.relative_time {
            return last;
        }

        let idx = self.trajectory.partition_point(|p| p.relative_time <= t);
        let p0 = &self.trajectory[idx - 1];
        let p1 = &self.trajectory[idx];
        let ratio = (t - p0.relative_time) / (p1.relative_time - p0.relative_time);
        let dheading = normalize_angle(p1.heading - p0.heading);
        TrajectoryPoint::new(
            p0.x + ratio * (p1.x - p0.x),
            p0.y + ratio * (p1.y - p0.y),
            normalize_angle(p0.heading + ratio * dheading),
            t,
        )
    }

    fn bounding_box(&self, point: &TrajectoryPoint) -> Box2d {
        Box2d::new(Point2D::new(point.x, point.y), point.heading, self.length, self.width)
    }
}
