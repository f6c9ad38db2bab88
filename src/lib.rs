pub mod api;
pub mod configuration;
pub mod core;
pub mod database;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config Error:{0}")]
    ConfigError(String),

    #[error("Service error:{0}")]
    ServiceError(String),
}
