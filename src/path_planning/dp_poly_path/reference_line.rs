//! Reference line backed by a 2D cubic spline
//!
//! Waypoints are parameterised by cumulative chord length, and each
//! coordinate is interpolated by a natural cubic spline whose second
//! derivative coefficients come from a tridiagonal solve.

extern crate nalgebra as na;

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::traits::ReferenceGeometry;
use crate::common::types::{Point2D, ReferencePoint, SLPoint};

#[derive(Debug, Clone)]
struct Spline {
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    x: Vec<f64>,
}

impl Spline {
    fn new(x: &[f64], y: &[f64]) -> PlanningResult<Spline> {
        let nx = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let a = y.to_vec();

        let a_mat = Spline::calc_a(&h);
        let b_mat = Spline::calc_b(&h, &a);
        let c_na = a_mat
            .lu()
            .solve(&b_mat)
            .ok_or_else(|| PlanningError::InvalidInput("spline system is singular".to_string()))?;
        let c: Vec<f64> = c_na.iter().copied().collect();

        let mut b = Vec::with_capacity(nx - 1);
        let mut d = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(Spline { a, b, c, d, x: x.to_vec() })
    }

    fn calc(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3)
    }

    fn calcd(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.b[i] + 2.0 * self.c[i] * dx + 3.0 * self.d[i] * dx.powi(2)
    }

    fn calcdd(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        2.0 * self.c[i] + 6.0 * self.d[i] * dx
    }

    /// Segment index containing `t`, clamped to the valid segments
    fn search_index(&self, t: f64) -> usize {
        let segments = self.x.len() - 1;
        let idx = self.x.partition_point(|&xi| xi <= t);
        idx.saturating_sub(1).min(segments - 1)
    }

    fn calc_a(h: &[f64]) -> na::DMatrix<f64> {
        let nx = h.len() + 1;
        let mut a = na::DMatrix::zeros(nx, nx);
        a[(0, 0)] = 1.0;
        for i in 0..nx - 1 {
            if i != nx - 2 {
                a[(i + 1, i + 1)] = 2.0 * (h[i] + h[i + 1]);
            }
            a[(i + 1, i)] = h[i];
            a[(i, i + 1)] = h[i];
        }
        a[(0, 1)] = 0.0;
        a[(nx - 1, nx - 2)] = 0.0;
        a[(nx - 1, nx - 1)] = 1.0;
        a
    }

    fn calc_b(h: &[f64], a: &[f64]) -> na::DVector<f64> {
        let nx = h.len() + 1;
        let mut b = na::DVector::zeros(nx);
        for i in 0..nx.saturating_sub(2) {
            b[i + 1] = 3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }
        b
    }
}

/// Road reference line in Cartesian space
#[derive(Debug, Clone)]
pub struct ReferenceLine {
    s: Vec<f64>,
    sx: Spline,
    sy: Spline,
}

impl ReferenceLine {
    /// Fit a reference line through the given waypoints
    pub fn new(x: &[f64], y: &[f64]) -> PlanningResult<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(PlanningError::InvalidInput(format!(
                "need at least 2 waypoints with matching x/y, got {} / {}",
                x.len(),
                y.len()
            )));
        }

        let mut s = Vec::with_capacity(x.len());
        s.push(0.0);
        for i in 1..x.len() {
            let ds = ((x[i] - x[i - 1]).powi(2) + (y[i] - y[i - 1]).powi(2)).sqrt();
            if !(ds > 0.0) {
                return Err(PlanningError::InvalidInput(format!(
                    "waypoints {} and {} coincide",
                    i - 1,
                    i
                )));
            }
            s.push(s[i - 1] + ds);
        }

        let sx = Spline::new(&s, x)?;
        let sy = Spline::new(&s, y)?;
        Ok(Self { s, sx, sy })
    }

    /// Total arc length [m]
    pub fn length(&self) -> f64 {
        self.s.last().copied().unwrap_or(0.0)
    }

    fn clamp_s(&self, s: f64) -> f64 {
        s.max(0.0).min(self.length())
    }

    pub fn calc_position(&self, s: f64) -> Point2D {
        let s = self.clamp_s(s);
        Point2D::new(self.sx.calc(s), self.sy.calc(s))
    }

    pub fn calc_yaw(&self, s: f64) -> f64 {
        let s = self.clamp_s(s);
        self.sy.calcd(s).atan2(self.sx.calcd(s))
    }

    pub fn calc_curvature(&self, s: f64) -> f64 {
        let s = self.clamp_s(s);
        let dx = self.sx.calcd(s);
        let ddx = self.sx.calcdd(s);
        let dy = self.sy.calcd(s);
        let ddy = self.sy.calcdd(s);
        (ddy * dx - ddx * dy) / (dx.powi(2) + dy.powi(2)).powf(1.5)
    }
}

impl ReferenceGeometry for ReferenceLine {
    fn sl_to_xy(&self, sl: &SLPoint) -> Point2D {
        let center = self.calc_position(sl.s);
        let yaw = self.calc_yaw(sl.s);
        Point2D::new(center.x - sl.l * yaw.sin(), center.y + sl.l * yaw.cos())
    }

    fn reference_point(&self, s: f64) -> ReferencePoint {
        let p = self.calc_position(s);
        ReferencePoint::new(p.x, p.y, self.calc_yaw(s), self.calc_curvature(s))
    }
}
