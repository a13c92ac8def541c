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

use url::Url;

/// Returns the lower-cased host of `u`, or `None` if `u` does not parse or has no authority.
///
/// No public-suffix-list resolution is performed here; this is the raw authority
/// (e.g. `api.monzo.com`), not a registrable domain.
pub fn host(u: &str) -> Option<String> {
    let parsed = Url::parse(u).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// `true` iff `link_host` is the same host as `seed_host` or a strict dot-suffix of it.
///
/// `evilmonzo.com` is rejected against `monzo.com`; `api.monzo.com` is accepted.
/// No public-suffix-list semantics: the caller is responsible for passing a sane seed host.
pub fn same_domain(seed_host: Option<&str>, link_host: Option<&str>) -> bool {
    match (seed_host, link_host) {
        (Some(seed), Some(link)) => link == seed || link.ends_with(&format!(".{seed}")),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn host_parses_authority() {
        assert_eq!(host("https://MONZO.com/home").as_deref(), Some("monzo.com"));
        assert_eq!(host("not a url"), None);
        assert_eq!(host("mailto:someone@monzo.com"), None);
    }

    #[test]
    fn same_domain_truth_table() {
        assert!(same_domain(Some("monzo.com"), Some("monzo.com")));
        assert!(same_domain(Some("monzo.com"), Some("api.monzo.com")));
        assert!(!same_domain(Some("monzo.com"), Some("evilmonzo.com")));
        assert!(!same_domain(Some("monzo.com"), Some("monzo.co.uk")));
        assert!(!same_domain(Some("monzo.com"), None));
    }

    #[test]
    fn same_domain_is_reflexive() {
        for h in ["monzo.com", "api.monzo.com", "x.y.z"] {
            assert!(same_domain(Some(h), Some(h)));
        }
    }
}
