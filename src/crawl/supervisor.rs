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

use crate::client::PageFetcher;
use crate::config::CrawlConfig;
use crate::crawl::errors::CrawlError;
use crate::crawl::worker;
use crate::frontier::Frontier;
use crate::robots::RobotsAuthority;
use crate::runtime::Shutdown;
use crate::sink::OutputSink;
use crate::sync::WorkerBarrier;
use crate::toolkit::domains;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary emitted once after drain completes (SPEC_FULL §B.2).
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub visited: u64,
    pub elapsed: Duration,
}

/// Brings up the worker pool from spec §4.6: admits the seed, spawns
/// `config.concurrency` workers, and returns once every worker has drained
/// or the shutdown deadline has elapsed.
pub async fn run(
    config: Arc<CrawlConfig>,
    frontier: Arc<dyn Frontier>,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<dyn RobotsAuthority>,
    sink: Arc<dyn OutputSink>,
    shutdown: Shutdown,
    shutdown_deadline: Duration,
) -> Result<RunSummary, CrawlError> {
    let started = Instant::now();
    let seed_host = domains::host(&config.start_url);

    frontier
        .push(&config.start_url, 0)
        .await
        .map_err(CrawlError::SeedAdmission)?;

    let pop_timeout = Duration::from_millis(config.timeout_ms.min(1_000).max(50));
    let concurrency = NonZeroUsize::new(config.concurrency).unwrap_or(NonZeroUsize::new(1).unwrap());
    let barrier = Arc::new(WorkerBarrier::new(concurrency, shutdown.child_token()));

    let mut handles = Vec::with_capacity(concurrency.get());
    for worker_id in 0..concurrency.get() {
        let config = config.clone();
        let frontier = frontier.clone();
        let fetcher = fetcher.clone();
        let robots = robots.clone();
        let sink = sink.clone();
        let barrier = barrier.clone();
        let seed_host = seed_host.clone();
        let shutdown = shutdown.clone();

        handles.push(tokio::spawn(async move {
            run_worker(
                worker_id,
                &config,
                frontier.as_ref(),
                fetcher.as_ref(),
                robots.as_ref(),
                sink.as_ref(),
                &barrier,
                &shutdown,
                pop_timeout,
            )
            .await;
        }));
    }

    let join_all = futures::future::join_all(handles);
    tokio::select! {
        _ = join_all => {}
        _ = tokio::time::sleep(shutdown_deadline) => {
            log::warn!("shutdown deadline of {shutdown_deadline:?} elapsed before all workers drained");
            barrier.cancellation_token().cancel();
        }
    }

    let visited = frontier.visited_count().await.map_err(CrawlError::Frontier)?;
    let summary = RunSummary {
        visited,
        elapsed: started.elapsed(),
    };
    log::info!(
        "crawl drained: {} urls visited in {:?}",
        summary.visited,
        summary.elapsed
    );
    Ok(summary)
}

async fn run_worker(
    worker_id: usize,
    config: &CrawlConfig,
    frontier: &dyn Frontier,
    fetcher: &dyn PageFetcher,
    robots: &dyn RobotsAuthority,
    sink: &dyn OutputSink,
    barrier: &WorkerBarrier,
    shutdown: &Shutdown,
    pop_timeout: Duration,
) {
    let seed_host = domains::host(&config.start_url);
    let cancellation = barrier.cancellation_token();

    loop {
        if shutdown.is_shutdown() || barrier.is_cancelled() {
            log::debug!("worker {worker_id} stopping on cancellation");
            return;
        }

        match frontier.pop_blocking(pop_timeout).await {
            Ok(Some(item)) => {
                worker::process(
                    item,
                    seed_host.as_deref(),
                    config,
                    frontier,
                    fetcher,
                    robots,
                    sink,
                    &cancellation,
                )
                .await;
            }
            Ok(None) => {
                if barrier.mark_idle() {
                    log::debug!("worker {worker_id} was last idle, pool draining");
                    return;
                }
                if shutdown.is_shutdown() {
                    return;
                }
                barrier.mark_active();
            }
            Err(err) => {
                log::error!("worker {worker_id} frontier error: {err}");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
