use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use gridnav_mapping::MapConfig;

use crate::sensor::ScanFilter;
use crate::sim::SimConfig;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Everything the harness reads at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub sim: SimConfig,
    pub scan: ScanFilter,
    /// Goal `[x, y]` to plan towards once the first scans are in.
    pub goal: Option<[f64; 2]>,
    /// Milliseconds without an integrated scan before the robot is stopped.
    pub watchdog_ms: Option<u64>,
}

/// Loads `config/default.toml` if present, then `GRIDNAV__*` environment
/// overrides (e.g. `GRIDNAV__MAP__CELL_SIZE=0.1`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("GRIDNAV").separator("__"))
        .build()
        .and_then(|c| c.try_deserialize::<AppConfig>());

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config_from("does/not/exist.toml").unwrap();
        assert_eq!(config.map, MapConfig::default());
        assert_eq!(config.scan.min_readings, 5);
        assert!(config.goal.is_none());
    }

    #[test]
    fn test_shipped_defaults_parse() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = load_config_from(path).unwrap();
        assert_eq!(config.map.view_size, 41);
        assert_eq!(config.map.cell_size, 0.25);
        assert_eq!(config.sim.beams, 7);
        assert_eq!(config.goal, Some([6.0, -6.0]));
    }
}
