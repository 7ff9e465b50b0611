use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug)]
pub struct BasaltConfig {
    #[serde(default = "defaults::sample")]
    pub sample: String,
    #[serde(default = "defaults::scheduler")]
    pub scheduler: SchedulerKind,
    #[serde(default = "defaults::iterations")]
    pub iterations: u64,
    #[serde(default = "defaults::poll_interval_us")]
    pub poll_interval_us: u64,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    Sequential,
    Parallel,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

mod defaults {
    use super::SchedulerKind;

    pub fn sample() -> String {
        "simple".into()
    }

    pub fn scheduler() -> SchedulerKind {
        SchedulerKind::Sequential
    }

    pub fn iterations() -> u64 {
        return 100;
    }

    pub fn poll_interval_us() -> u64 {
        return 100;
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

impl BasaltConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let basalt_config: BasaltConfig = toml::from_str(&toml_to_str)?;
        Ok(basalt_config)
    }
}
