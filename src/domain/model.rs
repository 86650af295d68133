use serde::{Deserialize, Serialize};

pub const DEFAULT_VELOCITY_MPS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRequest {
    pub target_distance: f64,
    pub velocity: f64,
}

impl TrajectoryRequest {
    pub fn new(target_distance: f64) -> Self {
        Self {
            target_distance,
            velocity: DEFAULT_VELOCITY_MPS,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySolution {
    pub launch_angle_degrees: f64,
    pub time_of_flight_seconds: f64,
    pub path: Vec<PathPoint>,
}

/// A single detection returned by the object detector, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRecord(pub serde_json::Value);

impl From<serde_json::Value> for PredictionRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
