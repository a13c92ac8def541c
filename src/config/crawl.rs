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
use serde::{Deserialize, Serialize};

/// The general crawling parameters, validated on construction (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Crawl"))]
pub struct CrawlConfig {
    /// The seed URL; defines the authoritative host for `sameDomain` checks.
    pub start_url: String,
    /// Number of worker tasks in this process's pool.
    pub concurrency: usize,
    /// Per-page fetch timeout, milliseconds.
    pub timeout_ms: u64,
    /// Maximum distance from the seed a URL may be admitted at.
    pub max_depth: u32,
    /// Exponential backoff bounds, milliseconds.
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    /// Uniform additive jitter bound, milliseconds.
    pub backoff_jitter_ms: u64,
    /// Maximum retriable attempts before backoff gives up.
    pub backoff_retries: u32,
    /// `robots.txt` fetch timeout, milliseconds.
    pub robots_timeout_ms: u64,
    /// The crawler's user-agent token, used both for fetching and for the
    /// robots.txt user-agent match.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    "monzo-crawler".to_string()
}

impl CrawlConfig {
    /// Validates the constraints from spec §3's CrawlConfig table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_url.trim().is_empty() {
            return Err(ConfigError::Invalid("startUrl must not be empty".into()));
        }
        url::Url::parse(&self.start_url)
            .map_err(|err| ConfigError::Invalid(format!("startUrl is not parseable: {err}")))?;
        if self.concurrency < 1 {
            return Err(ConfigError::Invalid("concurrency must be >= 1".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeoutMs must be > 0".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("maxDepth must be > 0".into()));
        }
        if !(self.backoff_base_ms > 0 && self.backoff_base_ms <= self.backoff_max_ms) {
            return Err(ConfigError::Invalid(
                "0 < backoffBaseMs <= backoffMaxMs must hold".into(),
            ));
        }
        if self.backoff_retries < 1 {
            return Err(ConfigError::Invalid("backoffRetries must be >= 1".into()));
        }
        if self.robots_timeout_ms == 0 {
            return Err(ConfigError::Invalid("robotsTimeoutMs must be > 0".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user agent must not be empty".into()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            start_url: "https://monzo.com/home".to_string(),
            concurrency: 1,
            timeout_ms: 5_000,
            max_depth: 10,
            backoff_base_ms: 100,
            backoff_max_ms: 1_000,
            backoff_jitter_ms: 50,
            backoff_retries: 3,
            robots_timeout_ms: 2_000,
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_empty_start_url() {
        let mut config = CrawlConfig::for_test();
        config.start_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut config = CrawlConfig::for_test();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_base_above_max_backoff() {
        let mut config = CrawlConfig::for_test();
        config.backoff_base_ms = 2_000;
        config.backoff_max_ms = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_a_well_formed_config() {
        assert!(CrawlConfig::for_test().validate().is_ok());
    }
}
