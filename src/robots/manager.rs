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

/// Decides whether a URL may be crawled according to its host's robots.txt.
///
/// Implementations must ensure a fetch happens at-most-once per host even
/// under concurrent callers racing on a cold cache (spec §4.4's concurrency
/// requirement).
#[async_trait]
pub trait RobotsAuthority: Send + Sync {
    async fn is_allowed(&self, u: &str) -> bool;
}
