// DP poly path trajectory cost demo
//
// Scores a fan of lateral quintic candidates against random parked
// obstacles and one oncoming vehicle, then plots the cheapest one.
//
// Usage: dp_poly_path [config.toml]
//
// Author: Ryohei Sasaki(@rsasaki0109)
use std::error::Error;
use std::fs;

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure};
use itertools::iproduct;
use log::{info, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use dp_poly_path::common::{
    Box2d, Curve1d, ObstacleHandle, ReferenceGeometry, SLPoint, TrajectoryPoint,
};
use dp_poly_path::path_planning::dp_poly_path::{
    DpPolyPathConfig, FootprintCache, PredictedObstacle, QuinticPolynomialCurve1d, ReferenceLine,
    SpeedData, TrajectoryCost, VehicleParam,
};

const NUM_PARKED: usize = 4;
const CRUISE_SPEED: f64 = 8.0; // [m/s]
const SPEED_HORIZON: f64 = 8.0; // [s]
const SPEED_DT: f64 = 0.1; // [s]
const OUTPUT_PATH: &str = "img/path_planning/dp_poly_path.svg";

fn load_config() -> Result<DpPolyPathConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let contents = fs::read_to_string(&path)?;
            let config = DpPolyPathConfig::from_toml_str(&contents)?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        None => Ok(DpPolyPathConfig::default()),
    }
}

fn random_obstacles(
    line: &ReferenceLine,
    rng: &mut StdRng,
) -> Result<Vec<PredictedObstacle>, Box<dyn Error>> {
    let lateral = Normal::new(0.0, 1.5)?;
    let mut obstacles = Vec::with_capacity(NUM_PARKED + 2);
    for i in 0..NUM_PARKED {
        let s = rng.gen_range(15.0..line.length() - 10.0);
        let l = lateral.sample(rng);
        let xy = line.sl_to_xy(&SLPoint::new(s, l));
        let heading = line.reference_point(s).heading;
        obstacles.push(PredictedObstacle::new_static(
            format!("parked_{}", i),
            TrajectoryPoint::new(xy.x, xy.y, heading, 0.0),
            4.5,
            2.0,
        ));
    }

    // Oncoming vehicle in the left lane
    let s = line.length() - 5.0;
    let xy = line.sl_to_xy(&SLPoint::new(s, 3.5));
    let heading = line.reference_point(s).heading + std::f64::consts::PI;
    obstacles.push(PredictedObstacle::new_constant_velocity(
        "oncoming",
        TrajectoryPoint::new(xy.x, xy.y, heading, 0.0),
        6.0,
        SPEED_HORIZON,
        SPEED_DT,
        4.8,
        2.0,
    ));

    // Stop line marker, never costed
    let xy = line.sl_to_xy(&SLPoint::new(line.length() - 1.0, 0.0));
    let pose = TrajectoryPoint::new(xy.x, xy.y, 0.0, 0.0);
    obstacles.push(PredictedObstacle::new_static("stop_line", pose, 0.1, 4.0).with_virtual(true));
    Ok(obstacles)
}

fn box_outline(b: &Box2d) -> (Vec<f64>, Vec<f64>) {
    let corners = b.corners();
    corners
        .iter()
        .chain(corners.iter().take(1))
        .map(|c| (c.x, c.y))
        .unzip()
}

fn sample_curve(
    line: &ReferenceLine,
    curve: &QuinticPolynomialCurve1d,
    start_s: f64,
    end_s: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = ((end_s - start_s) / 0.5) as usize;
    (0..=n)
        .map(|i| {
            let s = (i as f64 * 0.5).min(end_s - start_s);
            let xy = line.sl_to_xy(&SLPoint::new(start_s + s, curve.evaluate(0, s)));
            (xy.x, xy.y)
        })
        .unzip()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("DP poly path trajectory cost start!!");

    let config = load_config()?;
    let vehicle = VehicleParam::default();

    let wx = vec![0.0, 20.0, 40.0, 60.0, 80.0];
    let wy = vec![0.0, 3.0, 0.0, -4.0, 0.0];
    let line = ReferenceLine::new(&wx, &wy)?;
    let speed = SpeedData::constant_speed(CRUISE_SPEED, SPEED_HORIZON, SPEED_DT)?;

    let mut rng = StdRng::seed_from_u64(7);
    let obstacles = random_obstacles(&line, &mut rng)?;

    let init_sl = SLPoint::new(0.0, 0.0);
    let cache = FootprintCache::from_config(&obstacles, &config, &speed)?;
    let trajectory_cost = TrajectoryCost::new(&config, &line, &cache, vehicle, &speed, init_sl)?;

    let end_ls: Vec<f64> = (-6..=6).map(|i| i as f64 * 0.5).collect();
    let end_ss = [20.0, 30.0, 40.0];

    let mut candidates = Vec::new();
    for (&end_l, &end_s) in iproduct!(end_ls.iter(), end_ss.iter()) {
        let curve = QuinticPolynomialCurve1d::new([init_sl.l, 0.0, 0.0], [end_l, 0.0, 0.0], end_s)?;
        let cost = trajectory_cost.calculate_components(&curve, init_sl.s, init_sl.s + end_s)?;
        candidates.push((curve, end_s, cost));
    }
    println!("Scored {} candidates", candidates.len());

    let (best_curve, best_end_s, best_cost) = candidates
        .iter()
        .min_by_key(|(_, _, cost)| OrderedFloat(cost.total()))
        .ok_or("no candidates")?;
    println!(
        "Best candidate: end l = {:.2} m, length = {:.1} m, path cost = {:.2}, obstacle = {:.2}",
        best_curve.evaluate(0, best_curve.param_length()),
        best_end_s,
        best_cost.path_cost,
        best_cost.obstacle_cost
    );

    let mut fig = Figure::new();
    {
        let axes = fig.axes2d();
        axes.set_title("DP Poly Path Trajectory Cost", &[])
            .set_x_label("x [m]", &[])
            .set_y_label("y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0));

        let ref_s: Vec<f64> = (0..=(line.length() as usize)).map(|s| s as f64).collect();
        let ref_x: Vec<f64> = ref_s.iter().map(|&s| line.calc_position(s).x).collect();
        let ref_y: Vec<f64> = ref_s.iter().map(|&s| line.calc_position(s).y).collect();
        axes.lines(&ref_x, &ref_y, &[Caption("Reference"), Color("gray")]);

        for (curve, end_s, _) in &candidates {
            let (x, y) = sample_curve(&line, curve, init_sl.s, init_sl.s + end_s);
            axes.lines(&x, &y, &[Color("#C0C0C0")]);
        }

        for obstacle in obstacles.iter().filter(|o| !o.is_virtual()) {
            let (x, y) = box_outline(&obstacle.bounding_box(&obstacle.point_at_time(0.0)));
            axes.lines(&x, &y, &[Color("black")]);
        }

        let (x, y) = sample_curve(&line, best_curve, init_sl.s, init_sl.s + best_end_s);
        axes.lines(&x, &y, &[Caption("Best candidate"), Color("green")]);
    }

    fs::create_dir_all("img/path_planning")?;
    if fig.save_to_svg(OUTPUT_PATH, 800, 600).is_err() {
        warn!("Could not write {}, is gnuplot installed?", OUTPUT_PATH);
    } else {
        println!("Plot saved to {}", OUTPUT_PATH);
    }

    println!("DP poly path trajectory cost finish!!");
    Ok(())
}
