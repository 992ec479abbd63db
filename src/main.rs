use anyhow::Result;
use job_board::{logging, start_web_server, AppConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_tracing(config.log_format, config.log_file.as_deref())?;

    info!("Starting job board API server");
    info!(
        "Environment: {}",
        std::env::var("JOBBOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    );
    if config.jwt_secret == AppConfig::default().jwt_secret {
        warn!("Using the built-in JWT secret; set JWT_SECRET outside local development");
    }
    info!("Server: http://{}:{}", config.address, config.port);

    start_web_server(config).await
}
