pub mod scanner;
pub mod trajectory;

pub use crate::domain::model::{PathPoint, PredictionRecord, TrajectoryRequest, TrajectorySolution};
pub use crate::domain::ports::{ConfigProvider, ObjectDetector, Storage};
pub use crate::utils::error::Result;
