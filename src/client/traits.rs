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

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

/// Retriable HTTP statuses per spec: a struggling origin, not a permanent failure.
pub const RETRIABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

#[derive(Debug, Error)]
pub enum FetchError {
    /// Carries any non-2xx status. The caller distinguishes a backoff-worthy
    /// code (one of [`RETRIABLE_STATUSES`]) from any other non-2xx status, which
    /// is logged and dropped (spec §4.5 step 3).
    #[error("retriable status {0}")]
    RetriableStatus(u16),

    /// Any non-retriable failure: DNS failure, non-HTML content type, malformed
    /// URL, or a body parse failure.
    #[error("fatal fetch error: {0}")]
    Fatal(String),
}

impl FetchError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, FetchError::RetriableStatus(code) if RETRIABLE_STATUSES.contains(code))
    }
}

/// The external HTML fetcher collaborator (C3). Implementations fetch `u`,
/// resolve every `<a href>` found in the body against `u`, and return the
/// resulting set of absolute URLs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, u: &str) -> Result<HashSet<String>, FetchError>;
}
