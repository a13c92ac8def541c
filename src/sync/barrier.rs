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

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Sound termination detection for a pool of workers sharing a frontier
/// (spec §4.6's "active-worker counter" strategy).
///
/// Every worker starts active. A worker that finds the frontier momentarily
/// empty calls [`WorkerBarrier::mark_idle`]; if it is the last one to do so,
/// the shared cancellation token fires and every worker (including ones
/// still blocked in `popBlocking`) wakes up and exits. A worker that later
/// finds more work calls [`WorkerBarrier::mark_active`] to rejoin the active
/// set before its next blocking pop.
pub struct WorkerBarrier {
    total: NonZeroUsize,
    idle: AtomicUsize,
    cancellation: CancellationToken,
}

impl WorkerBarrier {
    pub fn new(total: NonZeroUsize, cancellation: CancellationToken) -> Self {
        Self {
            total,
            idle: AtomicUsize::new(0),
            cancellation,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Call after a blocking pop returns nothing. Returns `true` if this
    /// worker was the last one still looking for work, in which case the
    /// pool is drained and the caller should exit; the cancellation token
    /// has already been fired.
    pub fn mark_idle(&self) -> bool {
        let idle = self.idle.fetch_add(1, Ordering::SeqCst) + 1;
        if idle >= self.total.get() {
            self.cancellation.cancel();
            true
        } else {
            false
        }
    }

    /// Call before re-attempting a blocking pop after [`WorkerBarrier::mark_idle`]
    /// returned `false`: this worker is looking for work again, not settled.
    pub fn mark_active(&self) {
        self.idle.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn last_idle_worker_triggers_cancellation() {
        let token = CancellationToken::new();
        let barrier = WorkerBarrier::new(NonZeroUsize::new(2).unwrap(), token.clone());
        assert!(!barrier.mark_idle());
        assert!(!token.is_cancelled());
        assert!(barrier.mark_idle());
        assert!(token.is_cancelled());
    }

    #[test]
    fn rejoining_prevents_premature_cancellation() {
        let token = CancellationToken::new();
        let barrier = WorkerBarrier::new(NonZeroUsize::new(2).unwrap(), token.clone());
        assert!(!barrier.mark_idle());
        barrier.mark_active();
        assert!(!barrier.mark_idle());
        assert!(!token.is_cancelled());
    }
}
