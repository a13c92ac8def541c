// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::error::ConfigError;
use crate::config::redis::RedisConfig;
use crate::config::system::SystemConfig;
use crate::config::CrawlConfig;
use config::Config;
use serde::{Deserialize, Serialize};

/// The full, validated, immutable configuration for one crawler process.
///
/// Two construction paths produce the same object: [`CrawlerConfig::from_file`]
/// (YAML, with the named environment overrides from spec §6 applied on top)
/// and [`CrawlerConfig::from_parts`] (programmatic, used by the CLI's
/// flag-driven path and by tests).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Config"))]
pub struct CrawlerConfig {
    pub system: SystemConfig,
    pub crawl: CrawlConfig,
    pub redis: RedisConfig,
}

impl CrawlerConfig {
    pub fn from_parts(system: SystemConfig, crawl: CrawlConfig, redis: RedisConfig) -> Result<Self, ConfigError> {
        let config = Self { system, crawl, redis };
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML file at `path` through `config::File`, then applies
    /// `REDIS_HOST`/`REDIS_PORT` and the optional `MDC_*` overrides on top via
    /// [`apply_named_env_overrides`]. These are read directly by name rather
    /// than layered as a second `config::Environment` source: the spec's
    /// variable names split across two unrelated prefixes (`REDIS_*`,
    /// `MDC_*`) and name fields (`queue_key`, `brpop_timeout_ms`) that are
    /// themselves snake_case, which `config::Environment`'s separator-based
    /// nesting would misparse.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let built = Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        let config: Self = built.try_deserialize()?;
        let config = apply_named_env_overrides(config);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.crawl.validate()?;
        self.redis.validate()?;
        Ok(())
    }
}

/// Applies the literally-named environment variables from spec §6 on top of
/// an already-built config value.
pub fn apply_named_env_overrides(mut config: CrawlerConfig) -> CrawlerConfig {
    if let Ok(host) = std::env::var("REDIS_HOST") {
        config.redis.host = host;
    }
    if let Ok(port) = std::env::var("REDIS_PORT") {
        if let Ok(port) = port.parse() {
            config.redis.port = port;
        }
    }
    if let Ok(key) = std::env::var("MDC_QUEUE_KEY") {
        config.redis.queue_key = key;
    }
    if let Ok(key) = std::env::var("MDC_VISITED_SET_KEY") {
        config.redis.visited_key = key;
    }
    if let Ok(timeout) = std::env::var("MDC_BRPOP_TIMEOUT") {
        if let Ok(timeout) = timeout.parse() {
            config.redis.brpop_timeout_ms = timeout;
        }
    }
    config
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_parts_validates() {
        let config = CrawlerConfig::from_parts(
            SystemConfig::default(),
            CrawlConfig::for_test(),
            RedisConfig::default(),
        );
        assert!(config.is_ok());
    }

    #[test]
    fn named_env_overrides_apply() {
        std::env::set_var("REDIS_HOST", "coord.internal");
        std::env::set_var("REDIS_PORT", "7000");
        let config = CrawlerConfig::from_parts(
            SystemConfig::default(),
            CrawlConfig::for_test(),
            RedisConfig::default(),
        )
        .unwrap();
        let config = apply_named_env_overrides(config);
        assert_eq!(config.redis.host, "coord.internal");
        assert_eq!(config.redis.port, 7000);
        std::env::remove_var("REDIS_HOST");
        std::env::remove_var("REDIS_PORT");
    }
}
