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

mod args;
mod logging;

pub use args::CrawlArgs;

use crate::client::{build_classic_client, ClassicFetcher};
use crate::config::CrawlerConfig;
use crate::crawl::supervisor;
use crate::frontier::{Frontier, RedisFrontier};
use crate::robots::{MokaRobotsManager, RobotsAuthority};
use crate::runtime::GracefulShutdown;
use crate::sink::{OutputSink, StdoutSink};
use logging::configure_logging;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Loads the configuration, builds every collaborator, and runs the crawl to
/// completion (spec §6's CLI contract): exit code 0 on clean drain, non-zero
/// on a configuration or startup failure.
pub fn exec_args(args: CrawlArgs) -> ExitCode {
    let config = match CrawlerConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration from {:?}: {err}", args.config);
            return ExitCode::from(78);
        }
    };

    configure_logging(&config.system);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("failed to start async runtime: {err}");
            return ExitCode::from(71);
        }
    };

    runtime.block_on(run(config))
}

async fn run(config: CrawlerConfig) -> ExitCode {
    let frontier: Arc<dyn Frontier> = match RedisFrontier::new(
        &config.redis.host,
        config.redis.port,
        config.redis.pool_size,
        config.redis.keys(),
    ) {
        Ok(frontier) => Arc::new(frontier),
        Err(err) => {
            log::error!("failed to connect to coordination store: {err}");
            return ExitCode::from(75);
        }
    };

    let client = match build_classic_client(
        &config.crawl.user_agent,
        Duration::from_millis(config.crawl.timeout_ms),
    ) {
        Ok(client) => client,
        Err(err) => {
            log::error!("failed to build http client: {err}");
            return ExitCode::from(70);
        }
    };
    let fetcher = Arc::new(ClassicFetcher::new(client));

    let robots: Arc<dyn RobotsAuthority> = match MokaRobotsManager::new(
        config.crawl.user_agent.clone(),
        Duration::from_millis(config.crawl.robots_timeout_ms),
        config.system.robots_cache_size,
    ) {
        Ok(manager) => Arc::new(manager),
        Err(err) => {
            log::error!("failed to build robots.txt client: {err}");
            return ExitCode::from(70);
        }
    };

    let sink: Arc<dyn OutputSink> = Arc::new(StdoutSink::new());

    let graceful = GracefulShutdown::new();
    let shutdown = graceful.shutdown();
    let sender = graceful.sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("received interrupt, shutting down");
            sender.cancel();
        }
    });

    let shutdown_deadline = Duration::from_millis(config.system.shutdown_deadline_ms);
    let result = supervisor::run(
        Arc::new(config.crawl.clone()),
        frontier.clone(),
        fetcher,
        robots,
        sink,
        shutdown,
        shutdown_deadline,
    )
    .await;

    frontier.close().await;

    match result {
        Ok(summary) => {
            log::info!(
                "done: {} urls visited in {:?}",
                summary.visited,
                summary.elapsed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("crawl aborted: {err}");
            ExitCode::from(80)
        }
    }
}
