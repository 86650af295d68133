use crate::domain::model::PredictionRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn detector_endpoint(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn detector_headers(&self) -> &HashMap<String, String>;
}

/// The object detection collaborator: image bytes and a scope filter in,
/// predictions out.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn get_object_predictions(
        &self,
        image: &[u8],
        scope: &str,
    ) -> Result<Vec<PredictionRecord>>;
}
