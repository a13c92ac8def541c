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

use crate::client::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A [`PageFetcher`] keyed by exact URL, for the worker/supervisor scenario
/// tests in spec §8. A URL missing from the fixture map is treated as a
/// fatal error, matching "no such page" rather than silently succeeding.
pub struct FakePageFetcher {
    pages: Mutex<HashMap<String, Result<HashSet<String>, FetchError>>>,
}

impl FakePageFetcher {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<HashSet<String>, FetchError>)>,
    {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PageFetcher for FakePageFetcher {
    async fn fetch(&self, u: &str) -> Result<HashSet<String>, FetchError> {
        match self.pages.lock().unwrap().get(u) {
            Some(Ok(links)) => Ok(links.clone()),
            Some(Err(err)) => Err(clone_fetch_error(err)),
            None => Err(FetchError::Fatal(format!("no fixture for {u}"))),
        }
    }
}

fn clone_fetch_error(err: &FetchError) -> FetchError {
    match err {
        FetchError::RetriableStatus(code) => FetchError::RetriableStatus(*code),
        FetchError::Fatal(reason) => FetchError::Fatal(reason.clone()),
    }
}
