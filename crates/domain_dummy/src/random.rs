//! Driver that succeeds at random

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{parse_config, CoreError, DriverConfig, DriverError, DriverFactory, NotifyDriver, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RandomConfig {
    /// Chance of success, between 0 and 1
    #[serde(default = "default_probability")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub probability: f64,
}

fn default_probability() -> f64 {
    0.5
}

type Source = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Returns `true` when a uniform draw in `[0, 1)` is below the probability
#[derive(Clone)]
pub struct RandomDriver {
    probability: f64,
    source: Source,
}

impl RandomDriver {
    pub fn new(config: &RandomConfig) -> Self {
        Self::with_source(config, Arc::new(rand::random::<f64>))
    }

    /// Uses `source` instead of the thread RNG
    pub fn with_source(config: &RandomConfig, source: Source) -> Self {
        Self {
            probability: config.probability,
            source,
        }
    }
}

#[async_trait]
impl NotifyDriver for RandomDriver {
    async fn notify(&self, _payload: &Payload) -> Result<bool, DriverError> {
        Ok((self.source)() < self.probability)
    }
}

impl std::fmt::Debug for RandomDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomDriver")
            .field("probability", &self.probability)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDriverFactory;

impl DriverFactory for RandomDriverFactory {
    fn validate_config(&self, driver: &str, config: &DriverConfig) -> Result<(), CoreError> {
        parse_config::<RandomConfig>(driver, config).map(|_| ())
    }

    fn build(&self, driver: &str, config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        let config: RandomConfig = parse_config(driver, config)?;
        Ok(Arc::new(RandomDriver::new(&config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_utils::{ConfigFixtures, PayloadFixtures};

    fn fixed(value: f64) -> Source {
        Arc::new(move || value)
    }

    #[tokio::test]
    async fn test_draw_below_probability_passes() {
        let payload = PayloadFixtures::info_alert();
        let config = RandomConfig { probability: 0.5 };

        assert!(RandomDriver::with_source(&config, fixed(0.49)).notify(&payload).await.unwrap());
        assert!(!RandomDriver::with_source(&config, fixed(0.51)).notify(&payload).await.unwrap());

        let config = RandomConfig { probability: 0.53 };
        assert!(RandomDriver::with_source(&config, fixed(0.51)).notify(&payload).await.unwrap());
    }

    #[tokio::test]
    async fn test_extreme_probabilities() {
        let payload = PayloadFixtures::info_alert();
        let never = RandomDriver::new(&RandomConfig { probability: 0.0 });
        let always = RandomDriver::new(&RandomConfig { probability: 1.0 });
        for _ in 0..20 {
            assert!(!never.notify(&payload).await.unwrap());
            assert!(always.notify(&payload).await.unwrap());
        }
    }

    #[test]
    fn test_config_defaults_and_bounds() {
        let config: RandomConfig = parse_config("dummy_random", &ConfigFixtures::driver(json!({}))).unwrap();
        assert_eq!(config.probability, 0.5);

        assert!(RandomDriverFactory
            .validate_config("dummy_random", &ConfigFixtures::driver(json!({"probability": 1.5})))
            .is_err());
        assert!(RandomDriverFactory
            .validate_config("dummy_random", &ConfigFixtures::driver(json!({"probability": "high"})))
            .is_err());
    }
}
