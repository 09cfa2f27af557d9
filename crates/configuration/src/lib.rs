use crate::error::ConfigError;
use std::collections::HashSet;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    CountRange, DataSettings, ForecastSettings, GeneratorSettings, LoggingSettings,
    MetricsSettings, Overrides, RealRange, ServerSettings, Settings,
};

/// Prefix for environment overrides, e.g. `PULSE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "PULSE";

/// Longest trailing window the generator will synthesize, in days.
pub const MAX_DAYS: u32 = 366;

/// Loads the application configuration from `path` and the environment.
///
/// The file is optional: a missing file leaves every value at its default.
/// Environment variables named `PULSE__<SECTION>__<KEY>` are layered on top;
/// `PULSE__DATA__MARKETPLACES` takes a comma-separated list.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.marketplaces"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    tracing::debug!(path = %path.display(), "Configuration loaded.");

    Ok(settings)
}

/// Checks the cross-field rules that serde cannot express.
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let data = &settings.data;
    if data.marketplaces.is_empty() {
        return Err(ConfigError::invalid(
            "data.marketplaces",
            "must name at least one marketplace",
        ));
    }
    let mut seen = HashSet::new();
    for name in &data.marketplaces {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "data.marketplaces",
                "must not contain blank names",
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::invalid(
                "data.marketplaces",
                format!("lists '{}' more than once", name),
            ));
        }
    }
    if data.days == 0 {
        return Err(ConfigError::invalid("data.days", "must be greater than zero"));
    }
    if data.days > MAX_DAYS {
        return Err(ConfigError::invalid(
            "data.days",
            format!("must be at most {}, got {}", MAX_DAYS, data.days),
        ));
    }

    let generator = &settings.generator;
    check_count_range("generator.visits", generator.visits)?;
    check_count_range("generator.units_sold", generator.units_sold)?;
    check_count_range("generator.pages_viewed", generator.pages_viewed)?;
    if generator.pages_viewed.min == 0 {
        return Err(ConfigError::invalid(
            "generator.pages_viewed",
            "min must be at least 1",
        ));
    }
    let time = generator.time_on_page_minutes;
    if !(time.min.is_finite() && time.max.is_finite()) || time.min <= 0.0 || time.min > time.max {
        return Err(ConfigError::invalid(
            "generator.time_on_page_minutes",
            format!("must satisfy 0 < min <= max, got [{}, {}]", time.min, time.max),
        ));
    }

    let test_size = settings.forecast.test_size;
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ConfigError::invalid(
            "forecast.test_size",
            format!("must lie strictly between 0 and 1, got {}", test_size),
        ));
    }

    Ok(())
}

fn check_count_range(key: &str, range: CountRange) -> Result<(), ConfigError> {
    if range.min > range.max {
        return Err(ConfigError::invalid(
            key,
            format!("min {} is greater than max {}", range.min, range.max),
        ));
    }
    Ok(())
}
