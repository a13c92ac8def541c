// Copyright 2024. Felix Engl
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

use crate::config::SystemConfig;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

const PATTERN: &str = "{l} - {d} - {m}{n}";

/// Configures the process-wide logger from [`SystemConfig`], the way the
/// teacher wires `log4rs` up once at startup: a console sink by default, a
/// file sink (`crawl.log` in the working directory) when requested.
pub fn configure_logging(config: &SystemConfig) {
    let builder = Config::builder();

    let builder = if config.log_to_file {
        let file_logger = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build("crawl.log")
            .expect("failed to open log file");
        builder.appender(Appender::builder().build("out", Box::new(file_logger)))
    } else {
        let console_logger = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build();
        builder.appender(Appender::builder().build("out", Box::new(console_logger)))
    };

    let config = builder
        .logger(Logger::builder().build("crawlmesh", config.log_level))
        .build(Root::builder().appender("out").build(log::LevelFilter::Warn))
        .expect("failed to build logging configuration");

    let _ = log4rs::init_config(config);
}
