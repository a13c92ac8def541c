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

pub mod configs;
pub mod crawl;
pub mod error;
pub mod redis;
pub mod system;

pub use configs::CrawlerConfig;
pub use crawl::CrawlConfig;
pub use error::ConfigError;
pub use redis::RedisConfig;
pub use system::SystemConfig;
