use std::process::ExitCode;

use api::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from an optional .env file.
    dotenvy::dotenv().ok();
    api::telemetry::init("info");

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("startup aborted: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(port = config.port, tls = config.session.tls, "starting news-rag-backend");

    if let Err(e) = api::start(config).await {
        error!("server failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
