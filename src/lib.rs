pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{detector::HttpDetector, export::PathExporter, storage::LocalStorage};
pub use crate::config::ScannerConfig;
pub use crate::core::scanner::{ApiRequest, ApiResponse, ScannerApi, TrajectoryInput, TrajectoryOutput};
pub use crate::core::trajectory::{solve, TrajectorySolver};
pub use crate::utils::error::{Result, ScannerError};
