use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dp_poly_path::common::{ReferenceGeometry, SLPoint, SpeedProfile, TrajectoryPoint};
use dp_poly_path::path_planning::dp_poly_path::{
    num_time_stamps, planning_horizon, DpPolyPathConfig, FootprintCache, PredictedObstacle,
    QuinticPolynomialCurve1d, ReferenceLine, SpeedData, SpeedPoint, TrajectoryCost, VehicleParam,
};

fn curvy_line() -> ReferenceLine {
    ReferenceLine::new(
        &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
        &[0.0, 2.0, 0.0, -3.0, 0.0, 1.0],
    )
    .unwrap()
}

/// Mix of static and moving obstacles scattered around the reference line
fn random_obstacles(line: &ReferenceLine, seed: u64, count: usize) -> Vec<PredictedObstacle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let s = rng.gen_range(0.0..line.length());
            let l = rng.gen_range(-6.0..6.0);
            let xy = line.sl_to_xy(&SLPoint::new(s, l));
            let heading = line.reference_point(s).heading + rng.gen_range(-0.3..0.3);
            let pose = TrajectoryPoint::new(xy.x, xy.y, heading, 0.0);
            if rng.gen_bool(0.5) {
                PredictedObstacle::new_static(format!("static_{}", i), pose, 4.0, 2.0)
            } else {
                let speed = rng.gen_range(0.0..10.0);
                let id = format!("moving_{}", i);
                PredictedObstacle::new_constant_velocity(id, pose, speed, 6.0, 0.5, 4.5, 2.0)
            }
        })
        .collect()
}

fn evaluator<'a>(
    config: &DpPolyPathConfig,
    line: &'a ReferenceLine,
    cache: &'a FootprintCache,
    speed: &'a SpeedData,
) -> TrajectoryCost<'a, ReferenceLine, SpeedData> {
    TrajectoryCost::new(config, line, cache, VehicleParam::default(), speed, SLPoint::default())
        .unwrap()
}

fn total_cost(
    line: &ReferenceLine,
    speed: &SpeedData,
    obstacles: &[PredictedObstacle],
    curve: &QuinticPolynomialCurve1d,
    start_s: f64,
    end_s: f64,
) -> f64 {
    let config = DpPolyPathConfig::default();
    let cache = FootprintCache::from_config(obstacles, &config, speed).unwrap();
    let cost = evaluator(&config, line, &cache, speed);
    cost.calculate(curve, start_s, end_s).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32, .. ProptestConfig::default()
    })]

    #[test]
    fn cost_is_non_negative(
        seed in any::<u64>(),
        end_l in -4.0f64..4.0,
        start_s in 0.0f64..20.0,
        length in 5.0f64..40.0,
    ) {
        let line = curvy_line();
        let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
        let obstacles = random_obstacles(&line, seed, 6);
        let curve =
            QuinticPolynomialCurve1d::new([0.5, 0.0, 0.0], [end_l, 0.0, 0.0], length).unwrap();
        let cost = total_cost(&line, &speed, &obstacles, &curve, start_s, start_s + length);
        prop_assert!(cost >= 0.0, "negative cost {}", cost);
    }

    #[test]
    fn removing_or_ignoring_obstacles_never_increases_cost(
        seed in any::<u64>(),
        end_l in -4.0f64..4.0,
        length in 10.0f64..40.0,
        dropped in 0usize..6,
    ) {
        let line = curvy_line();
        let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
        let obstacles = random_obstacles(&line, seed, 6);
        let curve =
            QuinticPolynomialCurve1d::new([0.0, 0.0, 0.0], [end_l, 0.0, 0.0], length).unwrap();

        let full = total_cost(&line, &speed, &obstacles, &curve, 0.0, length);

        let mut removed = obstacles.clone();
        removed.remove(dropped);
        let without = total_cost(&line, &speed, &removed, &curve, 0.0, length);

        let ignored: Vec<PredictedObstacle> = obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| o.clone().with_ignore(i == dropped))
            .collect();
        let with_ignored = total_cost(&line, &speed, &ignored, &curve, 0.0, length);

        prop_assert!(without <= full + 1e-9);
        prop_assert!(with_ignored <= full + 1e-9);
        prop_assert!((without - with_ignored).abs() < 1e-9);
    }

    #[test]
    fn distance_zones_are_ordered(
        far in 20.0001f64..100.0,
        regular in 2.0001f64..20.0,
        risk in 0.2001f64..2.0,
        collision in 0.0f64..0.2,
    ) {
        let line = curvy_line();
        let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
        let config = DpPolyPathConfig::default();
        let obstacles: Vec<PredictedObstacle> = Vec::new();
        let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();
        let cost = evaluator(&config, &line, &cache, &speed);

        let c_far = cost.obstacle_cost_at_distance(far);
        let c_regular = cost.obstacle_cost_at_distance(regular);
        let c_risk = cost.obstacle_cost_at_distance(risk);
        let c_collision = cost.obstacle_cost_at_distance(collision);

        prop_assert_eq!(c_far, 0.0);
        prop_assert!(c_far <= c_regular);
        prop_assert!(c_regular <= c_risk);
        prop_assert!(c_risk <= c_collision);
        prop_assert_eq!(c_collision, config.obstacle_collision_cost);
    }

    #[test]
    fn repeated_evaluation_is_identical(
        seed in any::<u64>(),
        end_l in -4.0f64..4.0,
        length in 5.0f64..40.0,
    ) {
        let line = curvy_line();
        let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
        let obstacles = random_obstacles(&line, seed, 6);
        let config = DpPolyPathConfig::default();
        let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();
        let cost = evaluator(&config, &line, &cache, &speed);
        let curve =
            QuinticPolynomialCurve1d::new([0.0, 0.0, 0.0], [end_l, 0.0, 0.0], length).unwrap();

        let first = cost.calculate(&curve, 0.0, length).unwrap();
        let second = cost.calculate(&curve, 0.0, length).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn footprint_length_matches_horizon(
        seed in any::<u64>(),
        speed_horizon in 0.5f64..10.0,
        interval in 0.05f64..1.0,
    ) {
        let line = curvy_line();
        let speed = SpeedData::constant_speed(5.0, speed_horizon, 0.05).unwrap();
        let obstacles = random_obstacles(&line, seed, 4);
        let config = DpPolyPathConfig {
            eval_time_interval: interval,
            ..DpPolyPathConfig::default()
        };
        let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();

        let horizon = speed.total_time().min(config.prediction_total_time);
        let expected = (horizon / interval).floor() as usize + 1;
        prop_assert_eq!(cache.len(), obstacles.len());
        for footprint in cache.footprints() {
            prop_assert_eq!(footprint.boxes().len(), expected);
        }
        prop_assert_eq!(
            cache.num_time_stamps(),
            num_time_stamps(planning_horizon(&speed, config.prediction_total_time), interval)
        );
    }
}

#[test]
fn only_samples_inside_station_window_contribute() {
    // init_s = 0, [start_s, end_s] = [0, 10], profile 0 -> 0 m, 1 -> 5 m, 2 -> 12 m
    let line = ReferenceLine::new(&[0.0, 50.0, 100.0], &[0.0, 0.0, 0.0]).unwrap();
    let speed = SpeedData::new(vec![
        SpeedPoint::new(0.0, 0.0, 5.0),
        SpeedPoint::new(5.0, 1.0, 6.0),
        SpeedPoint::new(12.0, 2.0, 8.0),
        SpeedPoint::new(20.0, 3.0, 8.0),
    ])
    .unwrap();
    let config = DpPolyPathConfig {
        eval_time_interval: 1.0,
        ..DpPolyPathConfig::default()
    };
    // Obstacle parked on the reference line at x = 12 only collides at t = 2
    let obstacles = vec![PredictedObstacle::new_static(
        "parked",
        TrajectoryPoint::new(12.0, 0.0, 0.0, 0.0),
        2.0,
        2.0,
    )];
    let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();
    let vehicle = VehicleParam::new(4.0, 2.0);
    let cost =
        TrajectoryCost::new(&config, &line, &cache, vehicle, &speed, SLPoint::default()).unwrap();
    let curve = QuinticPolynomialCurve1d::new([0.0; 3], [0.0; 3], 10.0).unwrap();

    // Boxes 9 m (t = 0) and 4 m (t = 1) apart give regular costs 11 and 16
    let obstacle_cost = cost.calculate_obstacle_cost(&curve, 0.0, 10.0).unwrap();
    assert_relative_eq!(obstacle_cost, 11.0 + 16.0, epsilon = 1e-9);

    // Extending the window to reach t = 2 adds the collision
    let curve = QuinticPolynomialCurve1d::new([0.0; 3], [0.0; 3], 15.0).unwrap();
    let obstacle_cost = cost.calculate_obstacle_cost(&curve, 0.0, 15.0).unwrap();
    let expected = 11.0 + 16.0 + config.obstacle_collision_cost;
    assert_relative_eq!(obstacle_cost, expected, epsilon = 1e-9);
}

#[test]
fn evaluator_can_be_shared_across_threads() {
    fn assert_sync<T: Sync>(_: &T) {}

    let line = curvy_line();
    let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
    let obstacles = random_obstacles(&line, 42, 8);
    let config = DpPolyPathConfig::default();
    let cache = FootprintCache::from_config(&obstacles, &config, &speed).unwrap();
    let cost = evaluator(&config, &line, &cache, &speed);
    assert_sync(&cost);

    let curves: Vec<QuinticPolynomialCurve1d> = (-4..=4)
        .map(|i| QuinticPolynomialCurve1d::new([0.0; 3], [i as f64, 0.0, 0.0], 30.0).unwrap())
        .collect();
    let sequential: Vec<f64> = curves
        .iter()
        .map(|c| cost.calculate(c, 0.0, 30.0).unwrap())
        .collect();

    let parallel: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = curves
            .iter()
            .map(|c| {
                let cost = &cost;
                scope.spawn(move || cost.calculate(c, 0.0, 30.0).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}

#[test]
fn speed_profile_horizon_caps_prediction() {
    let speed = SpeedData::constant_speed(9.0, 12.0, 0.1).unwrap();
    let config = DpPolyPathConfig::default();
    assert_relative_eq!(planning_horizon(&speed, config.prediction_total_time), 5.0);
    assert!(speed.total_time() > config.prediction_total_time);
}

#[test]
fn tiny_steps_are_rejected_before_sampling() {
    let line = curvy_line();
    let speed = SpeedData::constant_speed(9.0, 7.0, 0.1).unwrap();
    let obstacles = random_obstacles(&line, 7, 3);

    let config = DpPolyPathConfig {
        eval_time_interval: 1e-300,
        ..DpPolyPathConfig::default()
    };
    assert!(FootprintCache::from_config(&obstacles, &config, &speed).is_err());
    assert!(DpPolyPathConfig::from_toml_str("path_resolution = 1e-30").is_err());
}
