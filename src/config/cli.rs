use crate::domain::model::DEFAULT_VELOCITY_MPS;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "tactical-scanner")]
#[command(about = "Projectile trajectory solver and object detection gateway")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Object detector endpoint, overrides [detector].endpoint
    #[arg(long, global = true)]
    pub detector_endpoint: Option<String>,

    /// Detector request timeout, overrides [detector].timeout_seconds
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report that the service is up
    Status,

    /// Compute the launch angle and path to hit a target
    Trajectory {
        /// Horizontal distance to the target in meters
        #[arg(long, allow_negative_numbers = true)]
        target_distance: f64,

        /// Muzzle velocity in m/s
        #[arg(long, default_value_t = DEFAULT_VELOCITY_MPS, allow_negative_numbers = true)]
        velocity: f64,

        /// Also write the path to a .csv or .json file ({timestamp} is expanded)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Send an image to the object detector
    Analyze {
        /// Image file to upload
        #[arg(long)]
        image: String,

        /// Category filter forwarded to the detector
        #[arg(long, default_value = "all")]
        scope: String,
    },
}
