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

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// System-level knobs that are not part of the crawl semantics: logging and
/// the size of the per-process robots.txt cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename(serialize = "System"))]
pub struct SystemConfig {
    /// Maximum number of hosts retained in the robots.txt cache.
    #[serde(default = "default_cache_size_robots")]
    pub robots_cache_size: NonZeroUsize,

    /// The log level of the crawler.
    #[serde(default = "default_log_level")]
    pub log_level: log::LevelFilter,

    /// Log to a file instead of the console.
    #[serde(default)]
    pub log_to_file: bool,

    /// Bounded shutdown deadline, milliseconds, after the first join attempt
    /// (spec §4.6 point 4, default 10s).
    #[serde(default = "default_shutdown_deadline_ms")]
    pub shutdown_deadline_ms: u64,
}

fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}
fn default_cache_size_robots() -> NonZeroUsize {
    NonZeroUsize::new(1024).expect("1024 is non-zero")
}
fn default_shutdown_deadline_ms() -> u64 {
    10_000
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            robots_cache_size: default_cache_size_robots(),
            log_level: default_log_level(),
            log_to_file: false,
            shutdown_deadline_ms: default_shutdown_deadline_ms(),
        }
    }
}
