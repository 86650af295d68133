use crate::core::ConfigProvider;
use crate::utils::error::{Result, ScannerError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_log_format(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl ScannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DETECTOR_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScannerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command line values win over the file.
    pub fn apply_overrides(&mut self, endpoint: Option<String>, timeout_seconds: Option<u64>) {
        if let Some(endpoint) = endpoint {
            tracing::debug!("Detector endpoint overridden to: {}", endpoint);
            self.detector.endpoint = Some(endpoint);
        }
        if let Some(timeout) = timeout_seconds {
            self.detector.timeout_seconds = timeout;
        }
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or(LogFormat::Compact)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl ConfigProvider for ScannerConfig {
    fn detector_endpoint(&self) -> Option<&str> {
        self.detector.endpoint.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.detector.timeout_seconds
    }

    fn detector_headers(&self) -> &HashMap<String, String> {
        &self.detector.headers
    }
}

impl Validate for ScannerConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.detector.endpoint {
            validate_url("detector.endpoint", endpoint)?;
        }

        validate_range(
            "detector.timeout_seconds",
            self.detector.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        if let Some(level) = &self.logging.level {
            validate_non_empty_string("logging.level", level)?;
        }

        validate_one_of(
            "logging.format",
            &self.logging.format.to_ascii_lowercase(),
            &["compact", "json"],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[detector]
endpoint = "http://localhost:9000/predict"
timeout_seconds = 5
headers = { Authorization = "Bearer abc" }

[logging]
level = "tactical_scanner=trace"
format = "json"
"#;

        let config = ScannerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.detector_endpoint(), Some("http://localhost:9000/predict"));
        assert_eq!(config.timeout_seconds(), 5);
        assert_eq!(
            config.detector_headers().get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(config.log_level(), Some("tactical_scanner=trace"));
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ScannerConfig::from_toml_str("").unwrap();

        assert_eq!(config.detector_endpoint(), None);
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SCANNER_DETECTOR_TOKEN", "secret-token");

        let toml_content = r#"
[detector]
endpoint = "https://detector.example.com/predict"
headers = { Authorization = "Bearer ${TEST_SCANNER_DETECTOR_TOKEN}", X-Missing = "${TEST_SCANNER_UNSET_VAR}" }
"#;

        let config = ScannerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.detector.headers.get("Authorization").unwrap(),
            "Bearer secret-token"
        );
        assert_eq!(
            config.detector.headers.get("X-Missing").unwrap(),
            "${TEST_SCANNER_UNSET_VAR}"
        );

        std::env::remove_var("TEST_SCANNER_DETECTOR_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = ScannerConfig::from_toml_str(
            r#"
[detector]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_timeout = ScannerConfig::from_toml_str(
            r#"
[detector]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_format = ScannerConfig::from_toml_str(
            r#"
[logging]
format = "xml"
"#,
        )
        .unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = ScannerConfig::from_toml_str("[detector\nendpoint = 1").unwrap_err();
        assert!(matches!(err, ScannerError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = ScannerConfig::from_toml_str(
            r#"
[detector]
endpoint = "http://file-endpoint/predict"
timeout_seconds = 10
"#,
        )
        .unwrap();

        config.apply_overrides(None, Some(20));
        assert_eq!(config.detector_endpoint(), Some("http://file-endpoint/predict"));
        assert_eq!(config.timeout_seconds(), 20);

        config.apply_overrides(Some("http://cli-endpoint/predict".to_string()), None);
        assert_eq!(config.detector_endpoint(), Some("http://cli-endpoint/predict"));
        assert_eq!(config.timeout_seconds(), 20);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[detector]
endpoint = "https://api.example.com/detect"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ScannerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.detector_endpoint(), Some("https://api.example.com/detect"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ScannerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ScannerError::IoError(_)));
    }
}
