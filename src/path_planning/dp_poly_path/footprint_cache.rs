//! Obstacle footprint cache
//!
//! Built once per planning cycle. Every physical, non-ignored obstacle
//! gets one oriented box per evaluation time sample; the trajectory cost
//! evaluator reads the boxes by time index for every candidate curve.

use log::debug;

use crate::common::box2d::Box2d;
use crate::common::error::{PlanningError, PlanningResult};
use crate::common::traits::{ObstacleHandle, SpeedProfile};

use super::config::{
    ensure_at_least, ensure_sample_count, DpPolyPathConfig, MIN_EVAL_TIME_INTERVAL,
};

/// Horizon covered by both the speed profile and the obstacle prediction
pub fn planning_horizon<S: SpeedProfile + ?Sized>(speed: &S, prediction_total_time: f64) -> f64 {
    speed.total_time().min(prediction_total_time)
}

/// Index of the last time sample, `floor(horizon / interval)`
pub fn num_time_stamps(horizon: f64, eval_time_interval: f64) -> usize {
    (horizon / eval_time_interval).floor().max(0.0) as usize
}

/// Predicted boxes of a single obstacle, one per time sample
#[derive(Debug, Clone)]
pub struct ObstacleFootprint {
    source_index: usize,
    boxes: Vec<Box2d>,
}

impl ObstacleFootprint {
    /// Position of the obstacle in the list the cache was built from
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn boxes(&self) -> &[Box2d] {
        &self.boxes
    }

    pub fn box_at(&self, time_index: usize) -> Option<&Box2d> {
        self.boxes.get(time_index)
    }
}

#[derive(Debug, Clone)]
pub struct FootprintCache {
    eval_time_interval: f64,
    num_time_stamps: usize,
    footprints: Vec<ObstacleFootprint>,
}

impl FootprintCache {
    /// Sample every relevant obstacle at `t = k * eval_time_interval`,
    /// `k = 0..=floor(horizon / eval_time_interval)`.
    pub fn new<'a, O, I>(
        obstacles: I,
        eval_time_interval: f64,
        horizon: f64,
    ) -> PlanningResult<Self>
    where
        O: ObstacleHandle + ?Sized + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        ensure_at_least("eval_time_interval", eval_time_interval, MIN_EVAL_TIME_INTERVAL)?;
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(PlanningError::Configuration(format!(
                "planning horizon must be finite and non-negative, got {}",
                horizon
            )));
        }

        ensure_sample_count(horizon, eval_time_interval)?;

        let num_time_stamps = num_time_stamps(horizon, eval_time_interval);
        let mut footprints = Vec::new();
        let mut skipped = 0;

        for (source_index, obstacle) in obstacles.into_iter().enumerate() {
            if obstacle.is_ignore() || obstacle.is_virtual() {
                skipped += 1;
                continue;
            }
            let boxes = (0..=num_time_stamps)
                .map(|t| {
                    let point = obstacle.point_at_time(t as f64 * eval_time_interval);
                    obstacle.bounding_box(&point)
                })
                .collect();
            footprints.push(ObstacleFootprint { source_index, boxes });
        }

        debug!(
            "footprint cache: {} obstacles kept, {} skipped, {} time samples every {}s",
            footprints.len(),
            skipped,
            num_time_stamps + 1,
            eval_time_interval
        );

        Ok(Self {
            eval_time_interval,
            num_time_stamps,
            footprints,
        })
    }

    /// Build with the configured interval over the speed profile horizon
    /// capped by the prediction horizon.
    pub fn from_config<'a, O, I, S>(
        obstacles: I,
        config: &DpPolyPathConfig,
        speed: &S,
    ) -> PlanningResult<Self>
    where
        O: ObstacleHandle + ?Sized + 'a,
        I: IntoIterator<Item = &'a O>,
        S: SpeedProfile + ?Sized,
    {
        config.validate()?;
        let horizon = planning_horizon(speed, config.prediction_total_time);
        Self::new(obstacles, config.eval_time_interval, horizon)
    }

    pub fn eval_time_interval(&self) -> f64 {
        self.eval_time_interval
    }

    /// Index of the last time sample; every footprint has this plus one boxes
    pub fn num_time_stamps(&self) -> usize {
        self.num_time_stamps
    }

    pub fn footprints(&self) -> &[ObstacleFootprint] {
        &self.footprints
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::TrajectoryPoint;
    use crate::path_planning::dp_poly_path::obstacle::PredictedObstacle;
    use crate::path_planning::dp_poly_path::speed_data::SpeedData;

    fn pose(x: f64, y: f64) -> TrajectoryPoint {
        TrajectoryPoint::new(x, y, 0.0, 0.0)
    }

    fn obstacles() -> Vec<PredictedObstacle> {
        vec![
            PredictedObstacle::new_constant_velocity(
                "moving",
                TrajectoryPoint::new(0.0, 0.0, 0.0, 0.0),
                2.0,
                8.0,
                0.5,
                4.0,
                2.0,
            ),
            PredictedObstacle::new_static("ignored", pose(5.0, 0.0), 1.0, 1.0).with_ignore(true),
            PredictedObstacle::new_static("stop", pose(9.0, 0.0), 0.1, 3.0).with_virtual(true),
            PredictedObstacle::new_static("parked", pose(20.0, 3.0), 4.0, 2.0),
        ]
    }

    #[test]
    fn test_skips_ignored_and_virtual() {
        let obstacles = obstacles();
        let cache = FootprintCache::new(&obstacles, 0.5, 2.0).unwrap();
        assert_eq!(cache.len(), 2);
        let kept: Vec<usize> = cache.footprints().iter().map(|f| f.source_index()).collect();
        assert_eq!(kept, vec![0, 3]);
    }

    #[test]
    fn test_sample_count_and_positions() {
        let obstacles = obstacles();
        let cache = FootprintCache::new(&obstacles, 0.5, 2.2).unwrap();
        assert_eq!(cache.num_time_stamps(), 4);
        for footprint in cache.footprints() {
            assert_eq!(footprint.boxes().len(), 5);
        }
        let moving = &cache.footprints()[0];
        let last = moving.box_at(4).unwrap();
        assert!((last.center().x - 4.0).abs() < 1e-9);
        assert!(moving.box_at(5).is_none());
    }

    #[test]
    fn test_from_config_uses_shorter_horizon() {
        let obstacles = obstacles();
        let config = DpPolyPathConfig::default();
        let short = SpeedData::constant_speed(10.0, 2.0, 0.1).unwrap();
        let long = SpeedData::constant_speed(10.0, 8.0, 0.1).unwrap();

        let cache = FootprintCache::from_config(&obstacles, &config, &short).unwrap();
        assert_eq!(cache.num_time_stamps(), num_time_stamps(short.total_time(), 0.1));

        let cache = FootprintCache::from_config(&obstacles, &config, &long).unwrap();
        assert_eq!(cache.num_time_stamps(), num_time_stamps(5.0, 0.1));
    }

    #[test]
    fn test_zero_horizon_keeps_single_sample() {
        let obstacles = obstacles();
        let cache = FootprintCache::new(&obstacles, 0.1, 0.0).unwrap();
        assert_eq!(cache.num_time_stamps(), 0);
        assert_eq!(cache.footprints()[0].boxes().len(), 1);
    }

    #[test]
    fn test_rejects_bad_interval() {
        let obstacles = obstacles();
        assert!(matches!(
            FootprintCache::new(&obstacles, 0.0, 5.0),
            Err(PlanningError::Configuration(_))
        ));
        assert!(FootprintCache::new(&obstacles, -0.1, 5.0).is_err());
        assert!(FootprintCache::new(&obstacles, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_oversampled_horizon() {
        let obstacles = obstacles();
        assert!(matches!(
            FootprintCache::new(&obstacles, 1e-300, 5.0),
            Err(PlanningError::Configuration(_))
        ));
        assert!(FootprintCache::new(&obstacles, 1e-9, 5.0).is_err());
        assert!(matches!(
            FootprintCache::new(&obstacles, MIN_EVAL_TIME_INTERVAL, 1e9),
            Err(PlanningError::Configuration(_))
        ));

        let cache = FootprintCache::new(&obstacles, MIN_EVAL_TIME_INTERVAL, 5.0).unwrap();
        assert_eq!(cache.num_time_stamps(), num_time_stamps(5.0, MIN_EVAL_TIME_INTERVAL));
    }

    #[test]
    fn test_trait_objects() {
        let boxed: Vec<Box<dyn ObstacleHandle>> = obstacles()
            .into_iter()
            .map(|o| Box::new(o) as Box<dyn ObstacleHandle>)
            .collect();
        let cache = FootprintCache::new(boxed.iter().map(|b| &**b), 0.5, 1.0).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
