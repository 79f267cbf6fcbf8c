use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use overrides::Overrides;
pub use settings::{
    Config, DatasetSettings, ExportSettings, FilterSettings, LateDeliverySettings, LoggingSettings,
    ReportSettings, ShipModeRule,
};

/// Prefix of environment variables that override the file, e.g.
/// `SUPERSTORE__DATASET__PATH=/data/sales.csv`.
pub const ENV_PREFIX: &str = "SUPERSTORE";

/// Loads the application configuration.
///
/// Reads `path` if it exists (a missing file means "all defaults"), layers
/// `SUPERSTORE__*` environment variables on top, deserializes the result into our
/// strongly-typed `Config` struct and validates it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with(path, environment())
}

/// `SUPERSTORE__SECTION__KEY` variables. Filter lists are comma-separated, e.g.
/// `SUPERSTORE__FILTERS__REGIONS=West,East`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("filters.years")
        .with_list_parse_key("filters.regions")
        .with_list_parse_key("filters.segments")
}

fn load_config_with(path: &Path, environment: config::Environment) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
