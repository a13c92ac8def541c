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

use crate::robots::{CachedRobots, RobotsAuthority, RobotsError};
use crate::toolkit::domains::host;
use async_trait::async_trait;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use texting_robots::Robot;
use time::OffsetDateTime;

/// A per-process robots.txt authority backed by a [`moka::future::Cache`].
///
/// `moka`'s `get_with` gives us the at-most-once-per-key fetch the spec asks
/// for directly: concurrent callers racing on the same cold host share the
/// single in-flight computation instead of each issuing their own request.
pub struct MokaRobotsManager {
    client: reqwest::Client,
    user_agent: String,
    cache: moka::future::Cache<String, Arc<CachedRobots>>,
}

impl MokaRobotsManager {
    pub fn new(user_agent: String, robots_timeout: Duration, cache_size: NonZeroUsize) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.clone())
            .timeout(robots_timeout)
            .build()?;
        Ok(Self {
            client,
            user_agent,
            cache: moka::future::Cache::new(cache_size.get() as u64),
        })
    }

    async fn fetch(&self, host: &str) -> CachedRobots {
        let url = format!("https://{host}/robots.txt");
        let retrieved_at = OffsetDateTime::now_utc();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                log::warn!(
                    "{}",
                    RobotsError::Transport {
                        host: host.to_string(),
                        source: err,
                    }
                );
                return CachedRobots::NoRobots { retrieved_at };
            }
        };

        if !response.status().is_success() {
            log::info!("host {host} returned {} for robots.txt, treating as allow-all", response.status());
            return CachedRobots::NoRobots { retrieved_at };
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                log::warn!(
                    "{}",
                    RobotsError::Transport {
                        host: host.to_string(),
                        source: err,
                    }
                );
                return CachedRobots::NoRobots { retrieved_at };
            }
        };

        match Robot::new(&self.user_agent, body.as_ref()) {
            Ok(robot) => CachedRobots::HasRobots {
                robot,
                retrieved_at,
            },
            Err(err) => {
                log::warn!(
                    "{}",
                    RobotsError::Parse {
                        host: host.to_string(),
                        source: err,
                    }
                );
                CachedRobots::NoRobots { retrieved_at }
            }
        }
    }
}

#[async_trait]
impl RobotsAuthority for MokaRobotsManager {
    async fn is_allowed(&self, u: &str) -> bool {
        let Some(h) = host(u) else {
            return false;
        };

        let cached = self
            .cache
            .get_with(h.clone(), async { Arc::new(self.fetch(&h).await) })
            .await;

        cached.allowed(u)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn no_host_is_disallowed() {
        let manager = MokaRobotsManager::new(
            "test-crawler".to_string(),
            Duration::from_secs(5),
            NonZeroUsize::new(32).unwrap(),
        )
        .unwrap();
        assert!(!manager.is_allowed("not a url").await);
    }
}
