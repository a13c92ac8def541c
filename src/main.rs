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

use crate::app::{exec_args, CrawlArgs};
use clap::Parser;
use std::process::ExitCode;

mod app;
mod client;
mod config;
mod crawl;
mod frontier;
mod robots;
mod runtime;
mod sink;
mod sync;
#[cfg(test)]
mod test_support;
mod toolkit;

fn main() -> ExitCode {
    exec_args(CrawlArgs::parse())
}
