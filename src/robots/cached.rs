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

use texting_robots::Robot;
use time::OffsetDateTime;

/// A per-host cache entry. `NoRobots` is the fail-open sentinel: whatever the
/// reason (transport error, non-success status, unparseable body), the host is
/// treated as allow-all from then on, for the lifetime of the process.
#[derive(Debug)]
pub enum CachedRobots {
    HasRobots {
        robot: Robot,
        retrieved_at: OffsetDateTime,
    },
    NoRobots {
        retrieved_at: OffsetDateTime,
    },
}

impl CachedRobots {
    /// Checks if `url` is allowed under these rules. Always `true` for the
    /// fail-open sentinel.
    pub fn allowed(&self, url: &str) -> bool {
        match self {
            CachedRobots::HasRobots { robot, .. } => robot.allowed(url),
            CachedRobots::NoRobots { .. } => true,
        }
    }

    pub fn retrieved_at(&self) -> OffsetDateTime {
        match self {
            CachedRobots::HasRobots { retrieved_at, .. } => *retrieved_at,
            CachedRobots::NoRobots { retrieved_at, .. } => *retrieved_at,
        }
    }
}
