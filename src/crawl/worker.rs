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

use crate::client::{FetchError, PageFetcher, RETRIABLE_STATUSES};
use crate::config::CrawlConfig;
use crate::crawl::backoff;
use crate::frontier::{Frontier, FrontierItem};
use crate::robots::RobotsAuthority;
use crate::sink::OutputSink;
use crate::toolkit::domains;
use tokio_util::sync::CancellationToken;

/// Runs the per-URL lifecycle from spec §4.5 for one item popped from the
/// frontier. `seed_host` is the host of `config.start_url`, computed once by
/// the supervisor and shared across every worker.
pub async fn process(
    item: FrontierItem,
    seed_host: Option<&str>,
    config: &CrawlConfig,
    frontier: &dyn Frontier,
    fetcher: &dyn PageFetcher,
    robots: &dyn RobotsAuthority,
    sink: &dyn OutputSink,
    cancellation: &CancellationToken,
) {
    let page_host = domains::host(&item.url);
    if !domains::same_domain(seed_host, page_host.as_deref()) {
        log::warn!(
            "dropping off-domain url {} found in the frontier (seed host {:?})",
            item.url,
            seed_host
        );
        return;
    }

    if !robots.is_allowed(&item.url).await {
        log::info!("robots.txt disallows {}", item.url);
        return;
    }

    let links = match fetcher.fetch(&item.url).await {
        Ok(links) => links,
        Err(FetchError::RetriableStatus(code)) if RETRIABLE_STATUSES.contains(&code) => {
            backoff::backoff(config, cancellation).await;
            let next_retry = item.retry_count + 1;
            if next_retry <= config.backoff_retries {
                if let Err(err) = frontier.requeue(&item.url, item.depth, next_retry).await {
                    log::error!("failed to requeue {} after retriable status: {err}", item.url);
                }
            } else {
                log::warn!(
                    "dropping {} after exhausting {} retriable attempts",
                    item.url,
                    config.backoff_retries
                );
            }
            return;
        }
        Err(FetchError::RetriableStatus(code)) => {
            log::warn!("unretriable status {code} fetching {}", item.url);
            return;
        }
        Err(FetchError::Fatal(reason)) => {
            log::error!("fatal error fetching {}: {reason}", item.url);
            return;
        }
    };

    let mut filtered = Vec::new();
    for link in links {
        let link_host = domains::host(&link);
        if !domains::same_domain(seed_host, link_host.as_deref()) {
            continue;
        }
        if !robots.is_allowed(&link).await {
            continue;
        }
        filtered.push(link);
    }
    filtered.sort();
    filtered.dedup();

    sink.emit(&item.url, &filtered).await;

    let child_depth = item.depth + 1;
    if child_depth > config.max_depth {
        log::debug!(
            "not admitting links from {} past max depth {}",
            item.url,
            config.max_depth
        );
        return;
    }
    for link in &filtered {
        if let Err(err) = frontier.push(link, child_depth).await {
            log::error!("failed to push {link}: {err}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{FakePageFetcher, InMemoryFrontier};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct AllowAll;
    #[async_trait::async_trait]
    impl RobotsAuthority for AllowAll {
        async fn is_allowed(&self, _u: &str) -> bool {
            true
        }
    }

    struct DenyAll;
    #[async_trait::async_trait]
    impl RobotsAuthority for DenyAll {
        async fn is_allowed(&self, _u: &str) -> bool {
            false
        }
    }

    struct DenySuffix(&'static str);
    #[async_trait::async_trait]
    impl RobotsAuthority for DenySuffix {
        async fn is_allowed(&self, u: &str) -> bool {
            !u.ends_with(self.0)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait::async_trait]
    impl OutputSink for RecordingSink {
        async fn emit(&self, page: &str, links: &[String]) {
            self.records
                .lock()
                .unwrap()
                .push((page.to_string(), links.to_vec()));
        }
    }

    fn item(url: &str) -> FrontierItem {
        FrontierItem {
            url: url.to_string(),
            depth: 0,
            retry_count: 0,
        }
    }

    #[tokio::test]
    async fn same_domain_filter_excludes_other_hosts() {
        let fetcher = FakePageFetcher::new([(
            "https://monzo.com/home".to_string(),
            Ok(HashSet::from([
                "https://monzo.com/careers".to_string(),
                "https://evil.com/".to_string(),
                "https://api.monzo.com/docs".to_string(),
            ])),
        )]);
        let frontier = InMemoryFrontier::new();
        let sink = RecordingSink::default();
        let config = CrawlConfig::for_test();
        process(
            item("https://monzo.com/home"),
            Some("monzo.com"),
            &config,
            &frontier,
            &fetcher,
            &AllowAll,
            &sink,
            &CancellationToken::new(),
        )
        .await;

        assert!(frontier.contains("https://monzo.com/careers"));
        assert!(frontier.contains("https://api.monzo.com/docs"));
        assert!(!frontier.contains("https://evil.com/"));
    }

    #[tokio::test]
    async fn robots_disallow_all_yields_no_admissions() {
        let fetcher = FakePageFetcher::new([(
            "https://monzo.com/home".to_string(),
            Ok(HashSet::from(["https://monzo.com/careers".to_string()])),
        )]);
        let frontier = InMemoryFrontier::new();
        let sink = RecordingSink::default();
        let config = CrawlConfig::for_test();
        process(
            item("https://monzo.com/home"),
            Some("monzo.com"),
            &config,
            &frontier,
            &fetcher,
            &DenyAll,
            &sink,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(frontier.pending_count(), 0);
        assert!(sink.records.lock().unwrap()[0].1.is_empty());
    }

    #[tokio::test]
    async fn robots_disallow_some_admits_only_allowed() {
        let fetcher = FakePageFetcher::new([(
            "https://monzo.com/home".to_string(),
            Ok(HashSet::from([
                "https://monzo.com/allowed".to_string(),
                "https://monzo.com/disallowed".to_string(),
            ])),
        )]);
        let frontier = InMemoryFrontier::new();
        let sink = RecordingSink::default();
        let config = CrawlConfig::for_test();
        process(
            item("https://monzo.com/home"),
            Some("monzo.com"),
            &config,
            &frontier,
            &fetcher,
            &DenySuffix("/disallowed"),
            &sink,
            &CancellationToken::new(),
        )
        .await;

        assert!(frontier.contains("https://monzo.com/allowed"));
        assert!(!frontier.contains("https://monzo.com/disallowed"));
    }

    #[tokio::test]
    async fn retriable_failure_requeues_with_incremented_retry_count() {
        let fetcher = FakePageFetcher::new([(
            "https://monzo.com/home".to_string(),
            Err(FetchError::RetriableStatus(429)),
        )]);
        let frontier = InMemoryFrontier::new();
        frontier.mark_seen("https://monzo.com/home");
        let sink = RecordingSink::default();
        let config = CrawlConfig {
            backoff_base_ms: 1,
            backoff_max_ms: 1,
            backoff_jitter_ms: 0,
            backoff_retries: 3,
            ..CrawlConfig::for_test()
        };
        process(
            item("https://monzo.com/home"),
            Some("monzo.com"),
            &config,
            &frontier,
            &fetcher,
            &AllowAll,
            &sink,
            &CancellationToken::new(),
        )
        .await;

        let requeued = frontier.pop().await.unwrap().expect("requeued item");
        assert_eq!(requeued.url, "https://monzo.com/home");
        assert_eq!(requeued.retry_count, 1);
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_link_page_drains_with_a_single_emission() {
        let fetcher = FakePageFetcher::new([(
            "https://monzo.com/home".to_string(),
            Ok(HashSet::new()),
        )]);
        let frontier = InMemoryFrontier::new();
        let sink = RecordingSink::default();
        let config = CrawlConfig::for_test();
        process(
            item("https://monzo.com/home"),
            Some("monzo.com"),
            &config,
            &frontier,
            &fetcher,
            &AllowAll,
            &sink,
            &CancellationToken::new(),
        )
        .await;

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].1.is_empty());
    }
}
