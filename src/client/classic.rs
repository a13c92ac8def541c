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

use crate::client::traits::{FetchError, PageFetcher};
use async_trait::async_trait;
use encoding_rs::Encoding;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Builds the reqwest client used by [`ClassicFetcher`]: a single long-lived
/// client reused across every fetch, carrying the crawler's user-agent and the
/// per-page timeout from config.
pub fn build_classic_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// The reference [`PageFetcher`]: fetches over HTTP(S), rejects non-HTML
/// responses, and extracts every absolute link reachable from an `<a href>`.
pub struct ClassicFetcher {
    client: reqwest::Client,
}

impl ClassicFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for ClassicFetcher {
    async fn fetch(&self, u: &str) -> Result<HashSet<String>, FetchError> {
        let base = Url::parse(u).map_err(|err| FetchError::Fatal(format!("malformed url: {err}")))?;

        let response = self
            .client
            .get(base.clone())
            .send()
            .await
            .map_err(|err| classify_transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RetriableStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let mime: mime::Mime = content_type
            .parse()
            .unwrap_or(mime::TEXT_PLAIN);
        if mime.type_() != mime::TEXT || mime.subtype() != mime::HTML {
            return Err(FetchError::Fatal(format!(
                "non-html content type: {content_type}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Fatal(format!("failed to read body: {err}")))?;
        let body = decode_body(&bytes, &content_type);

        Ok(extract_links(&body, &base))
    }
}

fn classify_transport_error(err: &reqwest::Error) -> FetchError {
    if let Some(status) = err.status() {
        FetchError::RetriableStatus(status.as_u16())
    } else if err.is_timeout() {
        FetchError::Fatal(format!("timed out: {err}"))
    } else {
        FetchError::Fatal(format!("transport error: {err}"))
    }
}

/// Decodes `bytes` using the charset declared in the `Content-Type` header,
/// falling back to sniffing with `chardetng` when none is present.
fn decode_body(bytes: &[u8], content_type: &str) -> String {
    let declared = content_type
        .split(';')
        .find_map(|part| part.trim().strip_prefix("charset="))
        .and_then(Encoding::for_label);

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    });

    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Resolves every `<a href>` in `document` against `base`, keeping only the
/// absolute forms (spec §4.3: "relative hrefs are resolved against `u`").
fn extract_links(document: &str, base: &Url) -> HashSet<String> {
    let html = Html::parse_document(document);
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    html.select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect()
}
