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

use std::sync::Arc;
use tokio_util::sync::{CancellationToken, DropGuard};

/// A cheap, cloneable handle that answers "has shutdown been requested".
#[derive(Debug, Clone)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn wait(&self) {
        self.token.cancelled().await
    }

    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the root [`CancellationToken`] for one process. Dropping the last
/// clone of the guard cancels the token, so a supervisor that panics before
/// calling [`ShutdownSignalSender::cancel`] still unblocks its workers.
#[derive(Debug, Clone)]
pub struct GracefulShutdown {
    shutdown: Shutdown,
    _guard: Arc<DropGuard>,
}

impl GracefulShutdown {
    pub fn new() -> Self {
        let shutdown = Shutdown::new();
        let guard = shutdown.token.clone().drop_guard();
        Self {
            shutdown,
            _guard: Arc::new(guard),
        }
    }

    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn sender(&self) -> ShutdownSignalSender {
        ShutdownSignalSender {
            token: self.shutdown.token.clone(),
        }
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Triggers cancellation for every clone of the associated [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownSignalSender {
    token: CancellationToken,
}

impl ShutdownSignalSender {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}
