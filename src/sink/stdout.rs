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

use crate::sink::OutputSink;
use async_trait::async_trait;
use std::io::Write;
use tokio::sync::Mutex;

/// The reference [`OutputSink`]: writes `<url>  →  <N> links` followed by one
/// indented line per link, to standard output. A single process-wide mutex
/// guards the whole record so two workers' writes never interleave.
pub struct StdoutSink {
    lock: Mutex<()>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputSink for StdoutSink {
    async fn emit(&self, page: &str, links: &[String]) {
        let _guard = self.lock.lock().await;
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{page}  →  {} links", links.len());
        for link in links {
            let _ = writeln!(handle, "    {link}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn emit_does_not_panic_on_empty_links() {
        let sink = StdoutSink::new();
        sink.emit("https://monzo.com/home", &[]).await;
    }
}
