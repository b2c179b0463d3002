//! Quintic polynomial lateral curve l(s)
//!
//! Connects a start lateral state (l, dl, ddl) to an end state over a
//! parameter length, as produced by the lattice sampler of the DP path
//! search.

use nalgebra::{Matrix3, Vector3};

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::traits::Curve1d;

#[derive(Debug, Clone, PartialEq)]
pub struct QuinticPolynomialCurve1d {
    coef: [f64; 6],
    param: f64,
}

impl QuinticPolynomialCurve1d {
    /// Fit the curve to boundary states `[x, dx, ddx]` at 0 and `param`
    pub fn new(start: [f64; 3], end: [f64; 3], param: f64) -> PlanningResult<Self> {
        if !param.is_finite() || param <= 0.0 {
            return Err(PlanningError::InvalidInput(format!(
                "quintic curve length must be positive, got {}",
                param
            )));
        }

        let a0 = start[0];
        let a1 = start[1];
        let a2 = start[2] / 2.0;

        let p2 = param * param;
        let p3 = p2 * param;
        let p4 = p3 * param;
        let p5 = p4 * param;

        // A * [a3, a4, a5]^T = b
        #[rustfmt::skip]
        let a = Matrix3::new(
            p3, p4, p5,
            3.0 * p2, 4.0 * p3, 5.0 * p4,
            6.0 * param, 12.0 * p2, 20.0 * p3,
        );
        let b = Vector3::new(
            end[0] - a0 - a1 * param - a2 * p2,
            end[1] - a1 - 2.0 * a2 * param,
            end[2] - 2.0 * a2,
        );

        let x = a.lu().solve(&b).ok_or_else(|| {
            PlanningError::InvalidInput(format!("quintic system is singular for length {}", param))
        })?;

        Ok(Self {
            coef: [a0, a1, a2, x[0], x[1], x[2]],
            param,
        })
    }

    /// Polynomial coefficients, lowest order first
    pub fn coefficients(&self) -> &[f64; 6] {
        &self.coef
    }
}

impl Curve1d for QuinticPolynomialCurve1d {
    fn evaluate(&self, order: u32, p: f64) -> f64 {
        let [a0, a1, a2, a3, a4, a5] = self.coef;
        match order {
            0 => ((((a5 * p + a4) * p + a3) * p + a2) * p + a1) * p + a0,
            1 => (((5.0 * a5 * p + 4.0 * a4) * p + 3.0 * a3) * p + 2.0 * a2) * p + a1,
            2 => ((20.0 * a5 * p + 12.0 * a4) * p + 6.0 * a3) * p + 2.0 * a2,
            3 => (60.0 * a5 * p + 24.0 * a4) * p + 6.0 * a3,
            4 => 120.0 * a5 * p + 24.0 * a4,
            5 => 120.0 * a5,
            _ => 0.0,
        }
    }

    fn param_length(&self) -> f64 {
        self.param
    }
}
