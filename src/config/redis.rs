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
use crate::frontier::redis_store::FrontierKeys;
use serde::{Deserialize, Serialize};

/// The coordination-store endpoint and key layout (spec §6). `host`/`port` are
/// overridden by the `REDIS_HOST`/`REDIS_PORT` environment variables; the key
/// names are overridden by `MDC_QUEUE_KEY`/`MDC_VISITED_SET_KEY`; the blocking
/// pop timeout by `MDC_BRPOP_TIMEOUT`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename(serialize = "Redis"))]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,

    #[serde(default = "default_queue_key")]
    pub queue_key: String,
    #[serde(default = "default_visited_key")]
    pub visited_key: String,
    #[serde(default = "default_depth_key")]
    pub depth_key: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_brpop_timeout_ms")]
    pub brpop_timeout_ms: u64,
}

fn default_queue_key() -> String {
    "frontier:queue".to_string()
}
fn default_visited_key() -> String {
    "frontier:visited".to_string()
}
fn default_depth_key() -> String {
    "frontier:depth".to_string()
}
fn default_pool_size() -> usize {
    16
}
fn default_brpop_timeout_ms() -> u64 {
    1_000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            queue_key: default_queue_key(),
            visited_key: default_visited_key(),
            depth_key: default_depth_key(),
            pool_size: default_pool_size(),
            brpop_timeout_ms: default_brpop_timeout_ms(),
        }
    }
}

impl RedisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("redis.host must not be empty".into()));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid("redis pool size must be >= 1".into()));
        }
        Ok(())
    }

    pub fn keys(&self) -> FrontierKeys {
        FrontierKeys {
            queue_key: self.queue_key.clone(),
            visited_key: self.visited_key.clone(),
            depth_key: self.depth_key.clone(),
        }
    }
}
