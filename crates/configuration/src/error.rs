use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Invalid late-delivery rules: {0}")]
    RuleError(#[from] features::FeatureError),

    #[error("Failed to initialise logging: {0}")]
    LoggingError(String),
}
