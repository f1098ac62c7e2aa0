use std::env;
use std::time::Duration;

use anyhow::{bail, Result};

use docstore::StoreConfig;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Records per inference call.
    pub model_batch_size: usize,
    /// Examined records between progress reports / throttle pauses.
    pub throttle_interval: usize,
    /// Pause after each throttle interval.
    pub throttle_delay: Duration,
    /// Records pulled from the source per fetch.
    pub fetch_size: usize,
    pub store: StoreConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_batch_size: 16,
            throttle_interval: 1000,
            throttle_delay: Duration::from_secs(5),
            fetch_size: 100,
            store: StoreConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with fallback to defaults.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var("PIPELINE_MODEL_BATCH_SIZE") {
            if let Ok(size) = value.parse::<usize>() {
                config.model_batch_size = size;
            }
        }

        if let Ok(value) = env::var("PIPELINE_THROTTLE_INTERVAL") {
            if let Ok(interval) = value.parse::<usize>() {
                config.throttle_interval = interval;
            }
        }

        if let Ok(value) = env::var("PIPELINE_THROTTLE_SECS") {
            if let Ok(secs) = value.parse::<u64>() {
                config.throttle_delay = Duration::from_secs(secs);
            }
        }

        if let Ok(value) = env::var("PIPELINE_FETCH_SIZE") {
            if let Ok(size) = value.parse::<usize>() {
                config.fetch_size = size;
            }
        }

        config.store = StoreConfig::from_env_or_default();
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_batch_size == 0 {
            bail!("Model batch size must be greater than zero");
        }

        if self.throttle_interval == 0 {
            bail!("Throttle interval must be greater than zero");
        }

        if self.fetch_size == 0 {
            bail!("Fetch size must be greater than zero");
        }

        self.store.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = PipelineConfig::default();
        config.model_batch_size = 0;
        assert!(config.validate().is_err());
    }
}
