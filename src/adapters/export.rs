use crate::core::scanner::TrajectoryOutput;
use crate::core::Storage;
use crate::utils::error::{Result, ScannerError};
use crate::utils::validation::validate_path;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(ScannerError::InvalidConfigValueError {
                field: "output".to_string(),
                value: filename.to_string(),
                reason: "Unsupported export format. Valid formats: csv, json".to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: String,
    #[serde(flatten)]
    trajectory: &'a TrajectoryOutput,
}

/// Writes computed trajectories through a [`Storage`] backend.
pub struct PathExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> PathExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Exports `trajectory` to `pattern`, where `{timestamp}` is replaced with
    /// the current UTC time. Returns the resolved file name.
    pub async fn export(&self, trajectory: &TrajectoryOutput, pattern: &str) -> Result<String> {
        let filename = resolve_filename(pattern);
        validate_path("output", &filename)?;
        let format = ExportFormat::from_filename(&filename)?;

        let data = match format {
            ExportFormat::Csv => render_csv(trajectory)?,
            ExportFormat::Json => render_json(trajectory)?,
        };

        tracing::debug!(
            "Writing {} path points ({} bytes) to {}",
            trajectory.path.len(),
            data.len(),
            filename
        );
        self.storage.write_file(&filename, &data).await?;

        Ok(filename)
    }
}

fn resolve_filename(pattern: &str) -> String {
    pattern.replace(
        "{timestamp}",
        &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
    )
}

fn render_csv(trajectory: &TrajectoryOutput) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in &trajectory.path {
        writer.serialize(point)?;
    }
    writer
        .into_inner()
        .map_err(|e| ScannerError::IoError(e.into_error()))
}

fn render_json(trajectory: &TrajectoryOutput) -> Result<Vec<u8>> {
    let export = JsonExport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        trajectory,
    };
    Ok(serde_json::to_vec_pretty(&export)?)
}
