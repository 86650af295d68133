use crate::core::trajectory::TrajectorySolver;
use crate::core::{
    ObjectDetector, PathPoint, PredictionRecord, TrajectoryRequest, TrajectorySolution,
};
use crate::domain::model::DEFAULT_VELOCITY_MPS;
use crate::utils::error::{Result, ScannerError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const STATUS_ROUTE: &str = "/";
pub const TRAJECTORY_ROUTE: &str = "/api/trajectory";
pub const ANALYZE_ROUTE: &str = "/api/analyze";

pub const STATUS_MESSAGE: &str = "Tactical Scanner API is running";

fn default_velocity() -> f64 {
    DEFAULT_VELOCITY_MPS
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryInput {
    pub target_distance: f64,
    #[serde(default = "default_velocity")]
    pub velocity: f64,
}

impl From<TrajectoryInput> for TrajectoryRequest {
    fn from(input: TrajectoryInput) -> Self {
        TrajectoryRequest::new(input.target_distance).with_velocity(input.velocity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOutput {
    pub path: Vec<PathPoint>,
    pub calculated_angle: f64,
    pub time_of_flight: f64,
}

impl From<TrajectorySolution> for TrajectoryOutput {
    fn from(solution: TrajectorySolution) -> Self {
        Self {
            path: solution.path,
            calculated_angle: solution.launch_angle_degrees,
            time_of_flight: solution.time_of_flight_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeOutput {
    pub predictions: Vec<PredictionRecord>,
}

/// A request already lifted off the wire by whatever front-end is in use.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Status,
    Trajectory { body: String },
    Analyze { scope: String, image: Vec<u8> },
}

impl ApiRequest {
    pub fn route(&self) -> &'static str {
        match self {
            ApiRequest::Status => STATUS_ROUTE,
            ApiRequest::Trajectory { .. } => TRAJECTORY_ROUTE,
            ApiRequest::Analyze { .. } => ANALYZE_ROUTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::from_error(&ScannerError::SerializationError(e)),
        }
    }

    pub fn from_error(error: &ScannerError) -> Self {
        Self {
            status: error.status_code(),
            body: json!({ "detail": error.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-facing adapter. Built once at start-up with its collaborators
/// injected, then shared across requests.
#[derive(Clone)]
pub struct ScannerApi {
    solver: TrajectorySolver,
    detector: Option<Arc<dyn ObjectDetector>>,
}

impl ScannerApi {
    pub fn new(solver: TrajectorySolver, detector: Arc<dyn ObjectDetector>) -> Self {
        Self {
            solver,
            detector: Some(detector),
        }
    }

    pub fn without_detector(solver: TrajectorySolver) -> Self {
        Self {
            solver,
            detector: None,
        }
    }

    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        tracing::debug!("Handling request for {}", request.route());

        let response = match request {
            ApiRequest::Status => self.status(),
            ApiRequest::Trajectory { body } => self.trajectory_json(&body),
            ApiRequest::Analyze { scope, image } => self.analyze(&scope, &image).await,
        };

        tracing::debug!("Responding with status {}", response.status);
        response
    }

    pub fn status(&self) -> ApiResponse {
        ApiResponse::ok(&json!({ "status": STATUS_MESSAGE }))
    }

    pub fn trajectory_json(&self, body: &str) -> ApiResponse {
        match decode_trajectory_input(body) {
            Ok(input) => self.trajectory(input),
            Err(e) => {
                tracing::warn!("Rejecting trajectory request: {}", e);
                ApiResponse::from_error(&e)
            }
        }
    }

    pub fn trajectory(&self, input: TrajectoryInput) -> ApiResponse {
        tracing::debug!(
            "Solving trajectory for target at {} m with velocity {} m/s",
            input.target_distance,
            input.velocity
        );

        match self.solver.solve(&input.into()) {
            Ok(solution) => {
                tracing::info!(
                    "Launch angle {}° with flight time {} s ({} path points)",
                    solution.launch_angle_degrees,
                    solution.time_of_flight_seconds,
                    solution.path.len()
                );
                ApiResponse::ok(&TrajectoryOutput::from(solution))
            }
            Err(e) => {
                tracing::info!("{} ({})", e, e.user_friendly_message());
                ApiResponse::from_error(&e)
            }
        }
    }

    pub async fn analyze(&self, scope: &str, image: &[u8]) -> ApiResponse {
        match self.predictions(scope, image).await {
            Ok(predictions) => ApiResponse::ok(&AnalyzeOutput { predictions }),
            Err(e) => {
                tracing::error!("Object detection failed: {}", e);
                ApiResponse::from_error(&e)
            }
        }
    }

    async fn predictions(&self, scope: &str, image: &[u8]) -> Result<Vec<PredictionRecord>> {
        let detector = self
            .detector
            .as_ref()
            .ok_or(ScannerError::DetectorNotConfigured)?;

        tracing::debug!(
            "Forwarding {} byte image with scope '{}' to detector",
            image.len(),
            scope
        );
        let predictions = detector.get_object_predictions(image, scope).await?;
        tracing::info!("Detector returned {} predictions", predictions.len());

        Ok(predictions)
    }
}

fn decode_trajectory_input(body: &str) -> Result<TrajectoryInput> {
    serde_json::from_str(body).map_err(|e| ScannerError::InvalidRequest {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingDetector {
        calls: Mutex<Vec<(Vec<u8>, String)>>,
        predictions: Vec<PredictionRecord>,
    }

    impl RecordingDetector {
        fn new(predictions: Vec<PredictionRecord>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                predictions,
            }
        }
    }

    #[async_trait]
    impl ObjectDetector for RecordingDetector {
        async fn get_object_predictions(
            &self,
            image: &[u8],
            scope: &str,
        ) -> Result<Vec<PredictionRecord>> {
            self.calls
                .lock()
                .unwrap()
                .push((image.to_vec(), scope.to_string()));
            Ok(self.predictions.clone())
        }
    }

    struct FailingDetector;

    #[async_trait]
    impl ObjectDetector for FailingDetector {
        async fn get_object_predictions(
            &self,
            _image: &[u8],
            _scope: &str,
        ) -> Result<Vec<PredictionRecord>> {
            Err(ScannerError::DetectorResponseError {
                status: 500,
                body: "model crashed".to_string(),
            })
        }
    }

    fn api() -> ScannerApi {
        ScannerApi::without_detector(TrajectorySolver::new())
    }

    #[test]
    fn test_status() {
        let response = api().status();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["status"], STATUS_MESSAGE);
    }

    #[test]
    fn test_trajectory_success_shape() {
        let response = api().trajectory(TrajectoryInput {
            target_distance: 500.0,
            velocity: 120.0,
        });

        assert_eq!(response.status, 200);
        assert_eq!(response.body["calculated_angle"], 9.96);
        assert_eq!(response.body["time_of_flight"], 4.23);
        assert_eq!(response.body["path"][0], json!({ "x": 0.0, "y": 0.0 }));
    }

    #[test]
    fn test_trajectory_unreachable_is_client_error() {
        let response = api().trajectory(TrajectoryInput {
            target_distance: 2000.0,
            velocity: 120.0,
        });

        assert_eq!(response.status, 400);
        assert_eq!(
            response.body,
            json!({ "detail": "Target is out of range for the given velocity." })
        );
    }

    #[test]
    fn test_trajectory_json_defaults_velocity() {
        let api = api();
        let with_default = api.trajectory_json(r#"{"target_distance": 500}"#);
        let explicit = api.trajectory_json(r#"{"target_distance": 500, "velocity": 120.0}"#);

        assert_eq!(with_default.status, 200);
        assert_eq!(with_default, explicit);
    }

    #[test]
    fn test_trajectory_json_rejects_bad_body() {
        let api = api();

        let missing = api.trajectory_json(r#"{"velocity": 100}"#);
        assert_eq!(missing.status, 422);
        assert!(missing.body["detail"]
            .as_str()
            .unwrap()
            .contains("target_distance"));

        let not_numeric = api.trajectory_json(r#"{"target_distance": "far"}"#);
        assert_eq!(not_numeric.status, 422);

        let not_json = api.trajectory_json("target_distance=500");
        assert_eq!(not_json.status, 422);
    }

    #[tokio::test]
    async fn test_analyze_passes_predictions_through() {
        let predictions = vec![
            PredictionRecord(json!({"label": "truck", "confidence": 0.91, "box": [1, 2, 3, 4]})),
            PredictionRecord(json!({"label": "person", "confidence": 0.5})),
        ];
        let detector = Arc::new(RecordingDetector::new(predictions.clone()));
        let api = ScannerApi::new(TrajectorySolver::new(), detector.clone());

        let response = api.analyze("vehicles", b"jpeg-bytes").await;

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({ "predictions": [
                {"label": "truck", "confidence": 0.91, "box": [1, 2, 3, 4]},
                {"label": "person", "confidence": 0.5}
            ]})
        );
        let calls = detector.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (b"jpeg-bytes".to_vec(), "vehicles".to_string()));
    }

    #[tokio::test]
    async fn test_analyze_detector_failure_is_bad_gateway() {
        let api = ScannerApi::new(TrajectorySolver::new(), Arc::new(FailingDetector));

        let response = api.analyze("all", b"img").await;

        assert_eq!(response.status, 502);
        assert!(response.body["detail"]
            .as_str()
            .unwrap()
            .contains("model crashed"));
    }

    #[tokio::test]
    async fn test_analyze_without_detector() {
        let response = api().analyze("all", b"img").await;
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_handle_dispatches_routes() {
        let detector = Arc::new(RecordingDetector::new(vec![]));
        let api = ScannerApi::new(TrajectorySolver::new(), detector);

        let status = api.handle(ApiRequest::Status).await;
        assert_eq!(status.body["status"], STATUS_MESSAGE);

        let request = ApiRequest::Trajectory {
            body: r#"{"target_distance": 0}"#.to_string(),
        };
        assert_eq!(request.route(), TRAJECTORY_ROUTE);
        let trajectory = api.handle(request).await;
        assert_eq!(trajectory.body["path"], json!([{ "x": 0.0, "y": 0.0 }]));

        let analyze = api
            .handle(ApiRequest::Analyze {
                scope: "all".to_string(),
                image: vec![1, 2, 3],
            })
            .await;
        assert!(analyze.is_success());
        assert_eq!(analyze.body, json!({ "predictions": [] }));
    }

    #[test]
    fn test_api_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScannerApi>();
    }
}
