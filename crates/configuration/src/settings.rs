use core_types::ConversionBasis;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty or missing `config.toml` yields a
/// working dashboard for the three stock marketplaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub generator: GeneratorSettings,
    pub metrics: MetricsSettings,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
}

/// Where the dashboard listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl ServerSettings {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which marketplaces exist and how much history is synthesized for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// The fixed marketplace set, in display order. The first entry is the default selection.
    pub marketplaces: Vec<String>,
    /// Length of the trailing window, in calendar days.
    pub days: u32,
    /// Seed for the generator. `None` draws fresh data on every start.
    pub seed: Option<u64>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            marketplaces: vec![
                "Magazine Luiza".to_string(),
                "Casas Bahia".to_string(),
                "Americanas".to_string(),
            ],
            days: 30,
            seed: None,
        }
    }
}

/// An inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

/// An inclusive real range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealRange {
    pub min: f64,
    pub max: f64,
}

/// Uniform sampling ranges used by the data generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub visits: CountRange,
    pub units_sold: CountRange,
    pub time_on_page_minutes: RealRange,
    pub pages_viewed: CountRange,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            visits: CountRange { min: 1000, max: 5000 },
            units_sold: CountRange { min: 50, max: 200 },
            time_on_page_minutes: RealRange { min: 1.0, max: 10.0 },
            pages_viewed: CountRange { min: 1, max: 10 },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub conversion_basis: ConversionBasis,
}

/// Holdout evaluation of the sales forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Fraction of the pooled samples withheld from fitting.
    pub test_size: f32,
    /// Seed for the train/test shuffle.
    pub split_seed: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            split_seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "pulse.log".to_string(),
        }
    }
}

/// Values supplied on the command line that win over the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Interface to bind the dashboard to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,
    /// Port to bind the dashboard to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
    /// Seed for reproducible synthetic data.
    #[cfg_attr(feature = "clap", arg(long))]
    pub seed: Option<u64>,
    /// Length of the trailing window, in days.
    #[cfg_attr(feature = "clap", arg(long))]
    pub days: Option<u32>,
}

impl Settings {
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(seed) = overrides.seed {
            self.data.seed = Some(seed);
        }
        if let Some(days) = overrides.days {
            self.data.days = days;
        }
    }
}
