//! Configuration for the DP poly path trajectory cost
//!
//! All parameters carry defaults tuned for on-road driving; a TOML
//! document only needs to list the values it overrides.

use serde::{Deserialize, Serialize};

use crate::common::error::{PlanningError, PlanningResult};

/// Smallest accepted `eval_time_interval` [s]
pub const MIN_EVAL_TIME_INTERVAL: f64 = 1e-3;
/// Smallest accepted `path_resolution` [m]
pub const MIN_PATH_RESOLUTION: f64 = 1e-3;
/// Upper bound on the samples of one footprint or one path cost walk
pub const MAX_SAMPLES: usize = 1_000_000;

/// Cost weights, sampling steps and obstacle distance thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DpPolyPathConfig {
    /// Time step between obstacle footprint samples [s]
    pub eval_time_interval: f64,
    /// Arc-length step of the path-shape cost walk [m]
    pub path_resolution: f64,
    /// Weight of |l|
    pub path_l_cost: f64,
    /// Weight of |dl/ds|
    pub path_dl_cost: f64,
    /// Obstacles farther than this contribute nothing [m]
    pub obstacle_ignore_distance: f64,
    /// At or below this distance a collision is assumed [m]
    pub obstacle_collision_distance: f64,
    /// At or below this distance the quadratic risk cost applies [m]
    pub obstacle_risk_distance: f64,
    /// Fixed penalty for a collision sample
    pub obstacle_collision_cost: f64,
    /// Distance at which the quadratic risk cost vanishes [m]
    pub obstacle_risk_cost_center: f64,
    /// Scale of the quadratic risk cost
    pub obstacle_risk_cost_scale: f64,
    /// Distance at which the linear regular cost reaches zero [m]
    pub obstacle_regular_cost_center: f64,
    /// Global cap on obstacle prediction horizon [s]
    pub prediction_total_time: f64,
}

impl Default for DpPolyPathConfig {
    fn default() -> Self {
        Self {
            eval_time_interval: 0.1,
            path_resolution: 0.1,
            path_l_cost: 6.5,
            path_dl_cost: 8000.0,
            obstacle_ignore_distance: 20.0,
            obstacle_collision_distance: 0.2,
            obstacle_risk_distance: 2.0,
            obstacle_collision_cost: 1000.0,
            obstacle_risk_cost_center: 5.0,
            obstacle_risk_cost_scale: 10.0,
            obstacle_regular_cost_center: 20.0,
            prediction_total_time: 5.0,
        }
    }
}

impl DpPolyPathConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> PlanningResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the evaluation loop forever or
    /// classify distances inconsistently.
    pub fn validate(&self) -> PlanningResult<()> {
        ensure_at_least("eval_time_interval", self.eval_time_interval, MIN_EVAL_TIME_INTERVAL)?;
        ensure_at_least("path_resolution", self.path_resolution, MIN_PATH_RESOLUTION)?;
        ensure_positive("prediction_total_time", self.prediction_total_time)?;
        ensure_sample_count(self.prediction_total_time, self.eval_time_interval)?;

        for (name, value) in [
            ("path_l_cost", self.path_l_cost),
            ("path_dl_cost", self.path_dl_cost),
            ("obstacle_collision_cost", self.obstacle_collision_cost),
            ("obstacle_risk_cost_scale", self.obstacle_risk_cost_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanningError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let ordered = self.obstacle_collision_distance < self.obstacle_risk_distance
            && self.obstacle_risk_distance < self.obstacle_ignore_distance;
        if !ordered {
            return Err(PlanningError::Configuration(format!(
                "obstacle distances must satisfy collision < risk < ignore, got {} / {} / {}",
                self.obstacle_collision_distance,
                self.obstacle_risk_distance,
                self.obstacle_ignore_distance
            )));
        }
        Ok(())
    }
}

fn ensure_positive(name: &str, value: f64) -> PlanningResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanningError::Configuration(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

pub(crate) fn ensure_at_least(name: &str, value: f64, min: f64) -> PlanningResult<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(PlanningError::Configuration(format!(
            "{} must be at least {}, got {}",
            name, min, value
        )))
    }
}

/// `span / step` samples must stay within `MAX_SAMPLES`
pub(crate) fn ensure_sample_count(span: f64, step: f64) -> PlanningResult<()> {
    if span / step <= MAX_SAMPLES as f64 {
        Ok(())
    } else {
        Err(PlanningError::Configuration(format!(
            "{} / {} exceeds {} samples",
            span, step, MAX_SAMPLES
        )))
    }
}

/// Ego vehicle footprint dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParam {
    /// Length [m]
    pub length: f64,
    /// Width [m]
    pub width: f64,
}

impl Default for VehicleParam {
    fn default() -> Self {
        Self {
            length: 4.933,
            width: 2.11,
        }
    }
}

impl VehicleParam {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DpPolyPathConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = DpPolyPathConfig::from_toml_str(
            "eval_time_interval = 0.2\nobstacle_collision_cost = 5000.0\n",
        )
        .unwrap();
        assert_eq!(config.eval_time_interval, 0.2);
        assert_eq!(config.obstacle_collision_cost, 5000.0);
        assert_eq!(config.path_resolution, 0.1);
    }

    #[test]
    fn test_non_positive_resolution_rejected() {
        let config = DpPolyPathConfig {
            path_resolution: 0.0,
            ..DpPolyPathConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::Configuration(_))));

        let err = DpPolyPathConfig::from_toml_str("eval_time_interval = -0.1").unwrap_err();
        assert!(matches!(err, PlanningError::Configuration(_)));
    }

    #[test]
    fn test_tiny_steps_rejected() {
        let config = DpPolyPathConfig {
            eval_time_interval: 1e-300,
            ..DpPolyPathConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::Configuration(_))));

        let config = DpPolyPathConfig {
            path_resolution: 1e-30,
            ..DpPolyPathConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::Configuration(_))));

        assert!(DpPolyPathConfig::from_toml_str("eval_time_interval = 1e-300").is_err());
        assert!(DpPolyPathConfig::from_toml_str("path_resolution = 1e-9").is_err());

        let config = DpPolyPathConfig {
            eval_time_interval: MIN_EVAL_TIME_INTERVAL,
            path_resolution: MIN_PATH_RESOLUTION,
            ..DpPolyPathConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prediction_horizon_sample_cap() {
        let config = DpPolyPathConfig {
            prediction_total_time: 1e12,
            ..DpPolyPathConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlanningError::Configuration(_))));
    }

    #[test]
    fn test_misordered_thresholds_rejected() {
        let config = DpPolyPathConfig {
            obstacle_risk_distance: 30.0,
            ..DpPolyPathConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = DpPolyPathConfig::from_toml_str("path_l_cost = \"high\"").unwrap_err();
        assert!(matches!(err, PlanningError::Toml(_)));
    }
}
