use crate::core::{PathPoint, TrajectoryRequest, TrajectorySolution};
use crate::utils::error::{Result, ScannerError};

/// Gravitational acceleration in m/s².
pub const GRAVITY_MPS2: f64 = 9.81;

/// Number of time samples taken over the flight.
pub const PATH_SAMPLES: usize = 50;

/// Closed-form solver for a projectile launched and landing at the same height.
///
/// Of the two launch angles that reach a given range (`θ` and `90° − θ`) the
/// solver always returns the lower one, i.e. the minimum-energy, flattest arc.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrajectorySolver;

impl TrajectorySolver {
    pub fn new() -> Self {
        Self
    }

    pub fn solve(&self, request: &TrajectoryRequest) -> Result<TrajectorySolution> {
        solve(request.target_distance, request.velocity)
    }
}

/// Computes the launch angle, time of flight and sampled path needed to hit a
/// target `target_distance` meters away at `velocity` m/s.
///
/// Fails with [`ScannerError::TargetUnreachable`] when `g·d / v²` falls
/// outside `[-1, 1]`, which also covers NaN and infinite ratios.
pub fn solve(target_distance: f64, velocity: f64) -> Result<TrajectorySolution> {
    let val = (GRAVITY_MPS2 * target_distance) / (velocity * velocity);
    if !(-1.0..=1.0).contains(&val) {
        return Err(ScannerError::TargetUnreachable {
            target_distance,
            velocity,
        });
    }

    let angle_rad = 0.5 * val.asin();
    let time_of_flight = (2.0 * velocity * angle_rad.sin()) / GRAVITY_MPS2;

    let path = sample_times(time_of_flight)
        .map(|t| {
            let x = velocity * angle_rad.cos() * t;
            let y = velocity * angle_rad.sin() * t - 0.5 * GRAVITY_MPS2 * (t * t);
            (x, y)
        })
        .filter(|&(_, y)| y >= 0.0)
        .map(|(x, y)| PathPoint {
            x: round2(x),
            y: round2(y),
        })
        .collect();

    Ok(TrajectorySolution {
        launch_angle_degrees: round2(angle_rad.to_degrees()),
        time_of_flight_seconds: round2(time_of_flight),
        path,
    })
}

/// Evenly spaced instants over `[0, duration]`, both ends included.
/// A zero-length flight deliberately collapses to the single instant `t = 0`
/// instead of repeating the launch point once per sample.
fn sample_times(duration: f64) -> impl Iterator<Item = f64> {
    let count = if duration == 0.0 { 1 } else { PATH_SAMPLES };
    let last = count.saturating_sub(1);

    (0..count).map(move |i| {
        if i == last {
            duration
        } else {
            duration * i as f64 / last as f64
        }
    })
}

/// Rounds to two decimals, half away from zero. Adding `0.0` normalises `-0.0`.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
