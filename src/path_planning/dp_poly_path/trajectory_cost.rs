//! Trajectory cost of a lateral candidate curve
//!
//! The cost has two parts:
//!
//! - path cost: weighted |l| and |dl| sampled along the curve every
//!   `path_resolution` meters
//! - obstacle cost: the curve is resampled in time through the heuristic
//!   speed profile, the ego box is placed at each sample and compared
//!   against every cached obstacle box of the same time index
//!
//! The evaluator only reads shared state, so one instance can score
//! candidates from several threads when its collaborators are `Sync`.

use log::{debug, trace, warn};

use crate::common::box2d::Box2d;
use crate::common::error::{PlanningError, PlanningResult};
use crate::common::traits::{Curve1d, ReferenceGeometry, SpeedProfile};
use crate::common::types::{normalize_angle, SLPoint};

use super::config::{DpPolyPathConfig, VehicleParam, MAX_SAMPLES};
use super::footprint_cache::{num_time_stamps, planning_horizon, FootprintCache};

/// Path and obstacle parts of a candidate's cost
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentCost {
    pub path_cost: f64,
    pub obstacle_cost: f64,
}

impl ComponentCost {
    pub fn total(&self) -> f64 {
        self.path_cost + self.obstacle_cost
    }
}

pub struct TrajectoryCost<'a, R: ?Sized, S: ?Sized> {
    config: DpPolyPathConfig,
    reference_line: &'a R,
    footprints: &'a FootprintCache,
    vehicle_param: VehicleParam,
    heuristic_speed_data: &'a S,
    init_sl_point: SLPoint,
    num_of_time_stamps: usize,
}

impl<'a, R, S> TrajectoryCost<'a, R, S>
where
    R: ReferenceGeometry + ?Sized,
    S: SpeedProfile + ?Sized,
{
    /// Create an evaluator for one planning cycle.
    ///
    /// The footprint cache must have been sampled with the same interval
    /// over the same horizon this evaluator derives from `config` and the
    /// speed profile.
    pub fn new(
        config: &DpPolyPathConfig,
        reference_line: &'a R,
        footprints: &'a FootprintCache,
        vehicle_param: VehicleParam,
        heuristic_speed_data: &'a S,
        init_sl_point: SLPoint,
    ) -> PlanningResult<Self> {
        config.validate()?;

        let total_time = planning_horizon(heuristic_speed_data, config.prediction_total_time);
        let num_of_time_stamps = num_time_stamps(total_time, config.eval_time_interval);

        if footprints.num_time_stamps() != num_of_time_stamps
            || (footprints.eval_time_interval() - config.eval_time_interval).abs() > f64::EPSILON
        {
            return Err(PlanningError::InternalInvariant(format!(
                "footprint cache sampled {} steps of {}s, evaluator expects {} steps of {}s",
                footprints.num_time_stamps(),
                footprints.eval_time_interval(),
                num_of_time_stamps,
                config.eval_time_interval
            )));
        }

        debug!(
            "trajectory cost: {} obstacles, {} time stamps, init s = {:.3}",
            footprints.len(),
            num_of_time_stamps,
            init_sl_point.s
        );

        Ok(Self {
            config: config.clone(),
            reference_line,
            footprints,
            vehicle_param,
            heuristic_speed_data,
            init_sl_point,
            num_of_time_stamps,
        })
    }

    pub fn config(&self) -> &DpPolyPathConfig {
        &self.config
    }

    /// Total cost of `curve` spanning `[start_s, end_s]`
    pub fn calculate<C: Curve1d + ?Sized>(
        &self,
        curve: &C,
        start_s: f64,
        end_s: f64,
    ) -> PlanningResult<f64> {
        Ok(self.calculate_components(curve, start_s, end_s)?.total())
    }

    pub fn calculate_components<C: Curve1d + ?Sized>(
        &self,
        curve: &C,
        start_s: f64,
        end_s: f64,
    ) -> PlanningResult<ComponentCost> {
        self.check_range(start_s, end_s)?;
        let cost = ComponentCost {
            path_cost: self.path_cost(curve, start_s, end_s),
            obstacle_cost: self.obstacle_cost(curve, start_s, end_s)?,
        };
        trace!(
            "candidate [{:.2}, {:.2}]: path {:.3}, obstacle {:.3}",
            start_s,
            end_s,
            cost.path_cost,
            cost.obstacle_cost
        );
        Ok(cost)
    }

    pub fn calculate_path_cost<C: Curve1d + ?Sized>(
        &self,
        curve: &C,
        start_s: f64,
        end_s: f64,
    ) -> PlanningResult<f64> {
        self.check_range(start_s, end_s)?;
        Ok(self.path_cost(curve, start_s, end_s))
    }

    pub fn calculate_obstacle_cost<C: Curve1d + ?Sized>(
        &self,
        curve: &C,
        start_s: f64,
        end_s: f64,
    ) -> PlanningResult<f64> {
        self.check_range(start_s, end_s)?;
        self.obstacle_cost(curve, start_s, end_s)
    }

    fn path_cost<C: Curve1d + ?Sized>(&self, curve: &C, start_s: f64, end_s: f64) -> f64 {
        let mut path_cost = 0.0;
        let mut path_s = 0.0;
        while path_s < end_s - start_s {
            let l = curve.evaluate(0, path_s).abs();
            path_cost += l * self.config.path_l_cost;

            let dl = curve.evaluate(1, path_s).abs();
            path_cost += dl * self.config.path_dl_cost;

            path_s += self.config.path_resolution;
        }
        path_cost
    }

    fn obstacle_cost<C: Curve1d + ?Sized>(
        &self,
        curve: &C,
        start_s: f64,
        end_s: f64,
    ) -> PlanningResult<f64> {
        let init_s = self.init_sl_point.s;
        let mut obstacle_cost = 0.0;

        for index in 0..self.num_of_time_stamps {
            let time_stamp = index as f64 * self.config.eval_time_interval;
            let rel_s = self.heuristic_speed_data.evaluate_by_time(time_stamp);
            if rel_s < start_s - init_s {
                continue;
            }
            // Station is non-decreasing in time, later samples are out of range too
            if rel_s > end_s - init_s {
                break;
            }

            let ego_box = self.ego_box(curve, start_s, rel_s);
            for footprint in self.footprints.footprints() {
                let obstacle_box = footprint.box_at(index).ok_or_else(|| {
                    PlanningError::InternalInvariant(format!(
                        "obstacle {} has no box for time index {}",
                        footprint.source_index(),
                        index
                    ))
                })?;
                obstacle_cost +=
                    self.obstacle_cost_at_distance(obstacle_box.distance_to(&ego_box));
            }
        }
        Ok(obstacle_cost)
    }

    /// Finite, non-empty station range short enough for the path walk
    fn check_range(&self, start_s: f64, end_s: f64) -> PlanningResult<()> {
        let valid = start_s.is_finite()
            && end_s.is_finite()
            && end_s > start_s
            && (end_s - start_s) / self.config.path_resolution <= MAX_SAMPLES as f64;
        if valid {
            Ok(())
        } else {
            warn!("rejecting candidate with station range [{}, {}]", start_s, end_s);
            Err(PlanningError::InvalidRange { start_s, end_s })
        }
    }

    /// Ego footprint where `curve` puts the vehicle at relative station `rel_s`
    pub fn ego_box<C: Curve1d + ?Sized>(&self, curve: &C, start_s: f64, rel_s: f64) -> Box2d {
        let station = self.init_sl_point.s + rel_s;
        let s = station - start_s;
        let l = curve.evaluate(0, s);
        let dl = curve.evaluate(1, s);

        let ego_xy = self.reference_line.sl_to_xy(&SLPoint::new(station, l));
        let reference_point = self.reference_line.reference_point(station);

        let one_minus_kappa_r_d = 1.0 - reference_point.kappa * l;
        let delta_theta = dl.atan2(one_minus_kappa_r_d);
        let theta = normalize_angle(delta_theta + reference_point.heading);
        Box2d::new(ego_xy, theta, self.vehicle_param.length, self.vehicle_param.width)
    }

    /// Piecewise cost of one ego/obstacle box pair `distance` apart
    pub fn obstacle_cost_at_distance(&self, distance: f64) -> f64 {
        if distance > self.config.obstacle_ignore_distance {
            0.0
        } else if distance <= self.config.obstacle_collision_distance {
            self.config.obstacle_collision_cost
        } else if distance <= self.config.obstacle_risk_distance {
            self.risk_distance_cost(distance)
        } else {
            self.regular_distance_cost(distance)
        }
    }

    pub fn risk_distance_cost(&self, distance: f64) -> f64 {
        let d = self.config.obstacle_risk_cost_center - distance;
        d * d * self.config.obstacle_risk_cost_scale
    }

    pub fn regular_distance_cost(&self, distance: f64) -> f64 {
        (self.config.obstacle_regular_cost_center - distance).max(0.0)
    }
}
