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

use crate::frontier::{Frontier, FrontierError, FrontierItem};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// An in-process [`Frontier`] double upholding the same Seen/Pending
/// invariants as [`crate::frontier::RedisFrontier`], for tests that don't
/// need a live coordination store.
#[derive(Default)]
pub struct InMemoryFrontier {
    pending: Mutex<VecDeque<FrontierItem>>,
    seen: Mutex<HashSet<String>>,
}

impl InMemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: `true` iff `url` currently sits in `Pending`.
    pub fn contains(&self, url: &str) -> bool {
        self.pending.lock().unwrap().iter().any(|item| item.url == url)
    }

    /// Test helper: the current size of `Pending`.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Test helper: admits `url` into `Seen` without touching `Pending`, to
    /// set up a requeue scenario without going through `push`.
    pub fn mark_seen(&self, url: &str) {
        self.seen.lock().unwrap().insert(url.to_string());
    }
}

#[async_trait]
impl Frontier for InMemoryFrontier {
    async fn push(&self, url: &str, depth: u32) -> Result<bool, FrontierError> {
        if url.is_empty() {
            return Ok(false);
        }
        let mut seen = self.seen.lock().unwrap();
        if !seen.insert(url.to_string()) {
            return Ok(false);
        }
        self.pending.lock().unwrap().push_back(FrontierItem {
            url: url.to_string(),
            depth,
            retry_count: 0,
        });
        Ok(true)
    }

    async fn requeue(&self, url: &str, depth: u32, retry_count: u32) -> Result<(), FrontierError> {
        self.pending.lock().unwrap().push_back(FrontierItem {
            url: url.to_string(),
            depth,
            retry_count,
        });
        Ok(())
    }

    async fn pop(&self) -> Result<Option<FrontierItem>, FrontierError> {
        Ok(self.pending.lock().unwrap().pop_front())
    }

    async fn pop_blocking(&self, timeout: Duration) -> Result<Option<FrontierItem>, FrontierError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(item) = self.pending.lock().unwrap().pop_front() {
                return Ok(Some(item));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn size(&self) -> Result<u64, FrontierError> {
        Ok(self.pending.lock().unwrap().len() as u64)
    }

    async fn has_seen(&self, url: &str) -> Result<bool, FrontierError> {
        Ok(self.seen.lock().unwrap().contains(url))
    }

    async fn visited_count(&self) -> Result<u64, FrontierError> {
        Ok(self.seen.lock().unwrap().len() as u64)
    }

    async fn clear(&self) -> Result<(), FrontierError> {
        self.pending.lock().unwrap().clear();
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), FrontierError> {
        self.pending.lock().unwrap().clear();
        self.seen.lock().unwrap().clear();
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn push_then_pop_returns_the_url() {
        let frontier = InMemoryFrontier::new();
        assert!(frontier.push("https://monzo.com/", 0).await.unwrap());
        let item = frontier.pop().await.unwrap().unwrap();
        assert_eq!(item.url, "https://monzo.com/");
    }

    #[tokio::test]
    async fn push_after_clear_all_is_newly_admitted() {
        let frontier = InMemoryFrontier::new();
        assert!(frontier.push("https://monzo.com/", 0).await.unwrap());
        frontier.clear_all().await.unwrap();
        assert!(frontier.push("https://monzo.com/", 0).await.unwrap());
    }

    #[tokio::test]
    async fn push_after_clear_is_rejected() {
        let frontier = InMemoryFrontier::new();
        assert!(frontier.push("https://monzo.com/", 0).await.unwrap());
        frontier.clear().await.unwrap();
        assert!(!frontier.push("https://monzo.com/", 0).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_push_admits_exactly_once() {
        use std::sync::Arc;
        let frontier = Arc::new(InMemoryFrontier::new());
        let a = frontier.clone();
        let b = frontier.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.push("https://x/", 0).await.unwrap() }),
            tokio::spawn(async move { b.push("https://x/", 0).await.unwrap() }),
        );
        assert_ne!(ra.unwrap(), rb.unwrap());
        assert_eq!(frontier.visited_count().await.unwrap(), 1);
        assert_eq!(frontier.size().await.unwrap(), 1);
    }
}
