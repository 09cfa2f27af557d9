use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Core(#[from] core_types::CoreError),

    #[error("Data generation failed: {0}")]
    Generator(#[from] generator::GeneratorError),

    #[error("Forecast training failed: {0}")]
    Forecast(#[from] forecaster::ForecastError),

    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
}
