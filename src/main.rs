use clap::Parser;
use std::sync::Arc;
use tactical_scanner::core::Storage;
use tactical_scanner::utils::{logger, validation::Validate};
use tactical_scanner::{
    ApiRequest, ApiResponse, CliConfig, Command, HttpDetector, LocalStorage, PathExporter,
    ScannerApi, ScannerConfig, ScannerError, TrajectoryInput, TrajectoryOutput, TrajectorySolver,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let mut config = match &cli.config {
        Some(path) => match ScannerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => ScannerConfig::default(),
    };
    config.apply_overrides(cli.detector_endpoint.clone(), cli.timeout_seconds);

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, config.log_level(), config.log_format());

    tracing::info!("Starting tactical-scanner CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let api = match build_api(&config) {
        Ok(api) => api,
        Err(e) => fail(&e),
    };

    let response = match cli.command {
        Command::Status => api.handle(ApiRequest::Status).await,
        Command::Trajectory {
            target_distance,
            velocity,
            output,
        } => {
            let response = api.trajectory(TrajectoryInput {
                target_distance,
                velocity,
            });
            if let Some(pattern) = output.filter(|_| response.is_success()) {
                export_path(&response, &pattern).await?;
            }
            response
        }
        Command::Analyze { image, scope } => {
            let storage = LocalStorage::new(".".to_string());
            let image = match storage.read_file(&image).await {
                Ok(bytes) => bytes,
                Err(e) => fail(&e),
            };
            api.handle(ApiRequest::Analyze { scope, image }).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&response.body)?);

    // 根據回應狀態決定退出碼
    match response.status {
        200..=299 => Ok(()),
        400..=499 => std::process::exit(1),
        _ => std::process::exit(2),
    }
}

fn build_api(config: &ScannerConfig) -> tactical_scanner::Result<ScannerApi> {
    let solver = TrajectorySolver::new();

    if config.detector.endpoint.is_none() {
        tracing::debug!("No detector endpoint configured, analyze requests will be refused");
        return Ok(ScannerApi::without_detector(solver));
    }

    let detector = HttpDetector::from_config(config)?;
    tracing::info!("🔍 Object detector at {}", detector.endpoint());
    Ok(ScannerApi::new(solver, Arc::new(detector)))
}

async fn export_path(response: &ApiResponse, pattern: &str) -> anyhow::Result<()> {
    let trajectory: TrajectoryOutput = serde_json::from_value(response.body.clone())?;
    let exporter = PathExporter::new(LocalStorage::new(".".to_string()));

    match exporter.export(&trajectory, pattern).await {
        Ok(filename) => {
            tracing::info!("📁 Path saved to: {}", filename);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &ScannerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}
