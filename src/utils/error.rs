use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Target is out of range for the given velocity.")]
    TargetUnreachable { target_distance: f64, velocity: f64 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Object detection is not configured")]
    DetectorNotConfigured,

    #[error("Detector request failed: {0}")]
    DetectorError(#[from] reqwest::Error),

    #[error("Detector responded with status {status}: {body}")]
    DetectorResponseError { status: u16, body: String },

    #[error("Unexpected detector payload: {message}")]
    InvalidDetectorPayload { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Request,
    Detector,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScannerError::TargetUnreachable { .. } => ErrorCategory::Domain,
            ScannerError::InvalidRequest { .. } => ErrorCategory::Request,
            ScannerError::DetectorNotConfigured
            | ScannerError::DetectorError(_)
            | ScannerError::DetectorResponseError { .. }
            | ScannerError::InvalidDetectorPayload { .. } => ErrorCategory::Detector,
            ScannerError::ConfigError { .. }
            | ScannerError::ConfigValidationError { .. }
            | ScannerError::InvalidConfigValueError { .. }
            | ScannerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScannerError::IoError(_)
            | ScannerError::SerializationError(_)
            | ScannerError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Domain | ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Detector => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the transport adapter answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ScannerError::TargetUnreachable { .. } => 400,
            ScannerError::InvalidRequest { .. } => 422,
            ScannerError::DetectorNotConfigured => 503,
            ScannerError::DetectorError(_)
            | ScannerError::DetectorResponseError { .. }
            | ScannerError::InvalidDetectorPayload { .. } => 502,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScannerError::TargetUnreachable {
                target_distance,
                velocity,
            } => format!(
                "A target {} m away cannot be reached at {} m/s",
                target_distance, velocity
            ),
            ScannerError::DetectorNotConfigured => {
                "No object detector endpoint has been configured".to_string()
            }
            ScannerError::DetectorError(e) if e.is_timeout() => {
                "The object detector did not answer in time".to_string()
            }
            ScannerError::DetectorError(_) => "Could not reach the object detector".to_string(),
            ScannerError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScannerError::TargetUnreachable { .. } => {
                "Increase the velocity or choose a closer target"
            }
            ScannerError::InvalidRequest { .. } => {
                "Send a JSON body with a numeric 'target_distance' and optional 'velocity'"
            }
            ScannerError::DetectorNotConfigured => {
                "Pass --detector-endpoint or set [detector].endpoint in the config file"
            }
            ScannerError::DetectorError(_) => {
                "Check that the detector service is running and reachable"
            }
            ScannerError::DetectorResponseError { .. }
            | ScannerError::InvalidDetectorPayload { .. } => {
                "Inspect the detector service logs for the failing request"
            }
            ScannerError::ConfigError { .. }
            | ScannerError::ConfigValidationError { .. }
            | ScannerError::InvalidConfigValueError { .. }
            | ScannerError::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments"
            }
            ScannerError::IoError(_) => "Check file paths and permissions",
            ScannerError::SerializationError(_) | ScannerError::CsvError(_) => {
                "Report this issue together with the offending input"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;
