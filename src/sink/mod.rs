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

pub mod stdout;

pub use stdout::StdoutSink;

use async_trait::async_trait;

/// Receives `(page, sorted links)` records, one per visited page (C8).
///
/// Implementations must serialize concurrent writes: the page line and its
/// link lines must never interleave with another worker's record.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn emit(&self, page: &str, links: &[String]);
}
