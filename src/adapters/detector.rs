use crate::core::{ConfigProvider, ObjectDetector, PredictionRecord};
use crate::utils::error::{Result, ScannerError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Object detector reached over HTTP.
///
/// Images are posted as raw bytes to the configured endpoint with the scope
/// in the query string. The service may answer with a bare JSON array of
/// predictions or with `{"predictions": [...]}`.
#[derive(Debug, Clone)]
pub struct HttpDetector {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
}

impl HttpDetector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            headers: HeaderMap::new(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = config
            .detector_endpoint()
            .ok_or(ScannerError::DetectorNotConfigured)?;

        let mut detector = Self::new(endpoint, Duration::from_secs(config.timeout_seconds()))?;
        detector.headers = build_headers(config.detector_headers())?;
        Ok(detector)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ObjectDetector for HttpDetector {
    async fn get_object_predictions(
        &self,
        image: &[u8],
        scope: &str,
    ) -> Result<Vec<PredictionRecord>> {
        tracing::debug!("Making detector request to: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("scope", scope)])
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Detector response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScannerError::DetectorResponseError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ScannerError::InvalidDetectorPayload {
                message: format!("response is not JSON: {}", e),
            })?;

        parse_predictions(payload)
    }
}

fn parse_predictions(payload: serde_json::Value) -> Result<Vec<PredictionRecord>> {
    let items = match payload {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("predictions") {
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => {
                return Err(ScannerError::InvalidDetectorPayload {
                    message: "'predictions' is not an array".to_string(),
                })
            }
            None => {
                return Err(ScannerError::InvalidDetectorPayload {
                    message: "object has no 'predictions' field".to_string(),
                })
            }
        },
        other => {
            return Err(ScannerError::InvalidDetectorPayload {
                message: format!("expected an array or object, got {}", other),
            })
        }
    };

    Ok(items.into_iter().map(PredictionRecord::from).collect())
}

fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ScannerError::InvalidConfigValueError {
                field: "detector.headers".to_string(),
                value: name.clone(),
                reason: e.to_string(),
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| ScannerError::InvalidConfigValueError {
                field: format!("detector.headers.{}", name),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}
