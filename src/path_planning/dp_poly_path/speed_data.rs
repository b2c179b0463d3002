//! Piecewise-linear heuristic speed profile

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::traits::SpeedProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPoint {
    /// Station relative to the cycle start [m]
    pub s: f64,
    /// Time [s]
    pub t: f64,
    /// Speed [m/s]
    pub v: f64,
}

impl SpeedPoint {
    pub fn new(s: f64, t: f64, v: f64) -> Self {
        Self { s, t, v }
    }
}

/// Time-ordered speed samples with non-decreasing station
#[derive(Debug, Clone, Default)]
pub struct SpeedData {
    points: Vec<SpeedPoint>,
}

impl SpeedData {
    pub fn new(points: Vec<SpeedPoint>) -> PlanningResult<Self> {
        for (i, w) in points.windows(2).enumerate() {
            if !(w[1].t > w[0].t) {
                return Err(PlanningError::InvalidInput(format!(
                    "speed point {} has time {} not after {}",
                    i + 1,
                    w[1].t,
                    w[0].t
                )));
            }
            if w[1].s < w[0].s {
                return Err(PlanningError::InvalidInput(format!(
                    "speed point {} moves backwards: s = {} after {}",
                    i + 1,
                    w[1].s,
                    w[0].s
                )));
            }
        }
        Ok(Self { points })
    }

    /// Cruise at `v` from t = 0 to `horizon`, sampled every `dt`
    pub fn constant_speed(v: f64, horizon: f64, dt: f64) -> PlanningResult<Self> {
        if !(dt > 0.0) || !(horizon >= 0.0) || v < 0.0 {
            return Err(PlanningError::InvalidInput(format!(
                "constant speed profile needs v >= 0, horizon >= 0, dt > 0; got {}, {}, {}",
                v, horizon, dt
            )));
        }
        let n = (horizon / dt).round() as usize;
        let points = (0..=n)
            .map(|i| {
                let t = i as f64 * dt;
                SpeedPoint::new(v * t, t, v)
            })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[SpeedPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl SpeedProfile for SpeedData {
    fn total_time(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }

    fn evaluate_by_time(&self, t: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if t <= first.t {
            return first.s;
        }
        if t >= last.t {
            return last.s;
        }
        let idx = self.points.partition_point(|p| p.t <= t);
        let p0 = &self.points[idx - 1];
        let p1 = &self.points[idx];
        let ratio = (t - p0.t) / (p1.t - p0.t);
        p0.s + ratio * (p1.s - p0.s)
    }
}
