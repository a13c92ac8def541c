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

/// Errors surfaced by a [`crate::frontier::Frontier`] implementation.
///
/// Transport errors are transient by policy (spec's coordination-store row): the
/// caller treats the URL as not-pushed and moves on, it is never retried here.
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("failed to acquire a pooled connection to the coordination store: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("coordination store transport error: {0}")]
    Redis(#[from] redis::RedisError),
}
