// Copyright 2024. Felix Engl
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

use clap::Parser;
use std::path::PathBuf;

/// A single-domain web crawler coordinated through a shared frontier store.
///
/// Takes no positional arguments (spec §6): all configuration comes from the
/// YAML file named by `--config`, with `REDIS_HOST`/`REDIS_PORT` and the
/// optional `MDC_*` variables overriding the coordination-store endpoint.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CrawlArgs {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "crawl.yaml")]
    pub config: PathBuf,
}
