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

use crate::config::crawl::CrawlConfig;
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Damps load against a struggling origin before the worker's next pop
/// (spec §4.9). The sleep itself never touches the frontier; the caller
/// decides separately whether to requeue the URL that triggered it.
///
/// Cancellation during the sleep returns immediately.
pub async fn backoff(config: &CrawlConfig, cancellation: &CancellationToken) {
    let mut attempt = 1u32;
    let mut delay = config.backoff_base_ms;

    while attempt <= config.backoff_retries && delay <= config.backoff_max_ms {
        let jitter = if config.backoff_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=config.backoff_jitter_ms)
        };
        let sleep = std::time::Duration::from_millis(delay + jitter);

        tokio::select! {
            _ = tokio::time::sleep(sleep) => {}
            _ = cancellation.cancelled() => return,
        }

        delay = (delay.saturating_mul(2)).min(config.backoff_max_ms);
        attempt += 1;
    }
}
