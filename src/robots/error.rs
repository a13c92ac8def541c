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

use thiserror::Error;

/// Errors encountered while fetching/parsing one host's robots.txt. Every
/// variant here is, by design, caught internally by the manager and folded
/// into the `NoRobots` fail-open sentinel (spec §4.4 step 4) rather than
/// surfaced to the crawl worker; it exists so that is logged with enough
/// context at `warn` level.
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("transport error fetching robots.txt for {host}: {source}")]
    Transport {
        host: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("robots.txt for {host} did not parse: {source}")]
    Parse {
        host: String,
        #[source]
        source: anyhow::Error,
    },
}
