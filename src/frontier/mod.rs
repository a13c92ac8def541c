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

pub mod errors;
pub mod redis_store;

pub use errors::FrontierError;
pub use redis_store::RedisFrontier;

use async_trait::async_trait;
use std::time::Duration;

/// A URL admitted to the frontier, together with its distance from the seed
/// and the number of times it has been requeued after a retriable status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: String,
    pub depth: u32,
    pub retry_count: u32,
}

/// The distributed frontier: the single atomic primitive that merges enqueue,
/// deduplication and dequeue so that N workers across M processes never
/// double-crawl a URL.
///
/// `Seen` is monotonic: once a URL is admitted it is never forgotten for the
/// lifetime of the coordination store. `Pending ⊆ Seen` shrinks on `pop` and
/// grows on `push`. Implementations must make `push` atomic across processes:
/// the `Seen`-insert and the `Pending`-enqueue succeed or fail together.
#[async_trait]
pub trait Frontier: Send + Sync {
    /// Admits `url` at the given `depth` (distance from the seed URL).
    ///
    /// Returns `true` if `url` was newly admitted (added to both `Seen` and
    /// `Pending`), `false` if it was already in `Seen`, empty, or otherwise
    /// rejected. The return value is advisory to the caller; rejection is
    /// expected and is not an error.
    async fn push(&self, url: &str, depth: u32) -> Result<bool, FrontierError>;

    /// Re-admits an already-`Seen` URL back into `Pending` after a retriable
    /// fetch failure, carrying its incremented retry count (SPEC_FULL §B.5).
    /// Unlike [`Frontier::push`], this never touches `Seen` and always
    /// succeeds: the URL's membership in `Seen` is exactly what licenses
    /// putting it back into `Pending` without violating admission atomicity.
    async fn requeue(&self, url: &str, depth: u32, retry_count: u32) -> Result<(), FrontierError>;

    /// Removes and returns one item from `Pending`, or `None` if it is empty.
    /// Non-blocking; exactly one caller receives any given item.
    async fn pop(&self) -> Result<Option<FrontierItem>, FrontierError>;

    /// Like [`Frontier::pop`], but blocks up to `timeout` waiting for an item
    /// to become available before returning `None`. Used for sound drain
    /// detection by the supervisor (spec's preferred termination strategy).
    async fn pop_blocking(&self, timeout: Duration) -> Result<Option<FrontierItem>, FrontierError>;

    /// The approximate cardinality of `Pending`. May be stale under contention.
    async fn size(&self) -> Result<u64, FrontierError>;

    /// `true` iff `url` has ever been admitted.
    async fn has_seen(&self, url: &str) -> Result<bool, FrontierError>;

    /// `|Seen|`.
    async fn visited_count(&self) -> Result<u64, FrontierError>;

    /// Empties `Pending`; `Seen` is untouched. Useful to force a drain.
    async fn clear(&self) -> Result<(), FrontierError>;

    /// Empties both `Pending` and `Seen`. Used by tests.
    async fn clear_all(&self) -> Result<(), FrontierError>;

    /// Releases any resources (connection pool) held by the store.
    async fn close(&self);
}
