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

use crate::frontier::FrontierError;
use thiserror::Error;

/// Errors that abort the supervisor itself, as opposed to per-URL failures
/// handled inline by the worker loop (spec §7's error table).
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to admit the seed url: {0}")]
    SeedAdmission(#[source] FrontierError),

    #[error("coordination store is unavailable: {0}")]
    Frontier(#[from] FrontierError),
}
