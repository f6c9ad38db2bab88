use dotenvy::dotenv;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_directory::configuration::{config_path, Config, Context};
use user_directory::core::{HttpService, ServiceManager};
use user_directory::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    let config_file = config_path();
    let config = Config::new(&config_file).map_err(|e| AppError::ConfigError(e.to_string()))?;

    let log_level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(log_level.to_string()))
        .init();
    tracing::info!("Starting User Directory, config from {}", config_file);

    let context = Context::new(config)
        .await
        .map_err(|e| AppError::ConfigError(e.to_string()))?;

    let mut service_manager = ServiceManager::new(context);
    service_manager.spawn::<HttpService>();

    service_manager
        .wait()
        .await
        .map_err(|e| AppError::ServiceError(e.to_string()))
}
