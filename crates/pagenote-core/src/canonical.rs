//! URL canonicalization.
//!
//! Two URLs that differ only in fragment, query parameter order, host case
//! or an explicit default port must canonicalize to the same string, since
//! the canonical string is what gets hashed into storage paths and index tags.
//!
//! Rules, applied in order:
//! - Fragment removed
//! - Query parameters sorted by key, then value (byte-wise)
//! - Host lowercased
//! - Port removed when it is the scheme default (80 for http, 443 for https)
//!
//! A trailing slash is significant: `https://example.com` and
//! `https://example.com/` stay distinct. Canonicalization is idempotent.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::{form_urlencoded, Url};

use crate::error::{CoreError, Result};

/// A URL in canonical form.
///
/// Only [`canonicalize`] constructs one, so holding a `CanonicalUrl` means
/// the normalization rules have been applied.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Borrow the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalUrl({})", self.0)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CanonicalUrl {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self> {
        canonicalize(&raw)
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0
    }
}

/// Canonicalize a raw URL string.
///
/// Fails with [`CoreError::InvalidUrl`] if the input does not parse.
pub fn canonicalize(raw: &str) -> Result<CanonicalUrl> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| CoreError::invalid_url(raw, e))?;

    let mut out = String::with_capacity(trimmed.len());
    out.push_str(url.scheme());
    out.push(':');

    if url.has_authority() {
        out.push_str("//");

        if !url.username().is_empty() || url.password().is_some() {
            out.push_str(url.username());
            if let Some(password) = url.password() {
                out.push(':');
                out.push_str(password);
            }
            out.push('@');
        }

        if let Some(host) = url.host_str() {
            out.push_str(&host.to_ascii_lowercase());
        }

        if let Some(port) = url.port() {
            if default_port(url.scheme()) != Some(port) {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }
    }

    // The parser turns an empty hierarchical path into "/"; put it back.
    let path = url.path();
    if !(url.has_authority() && path == "/" && !has_explicit_path(trimmed)) {
        out.push_str(path);
    }

    if let Some(query) = url.query() {
        let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        if !pairs.is_empty() {
            pairs.sort();
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            out.push('?');
            out.push_str(&encoded);
        }
    }

    Ok(CanonicalUrl(out))
}

/// Default port for the schemes whose port we strip.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Whether the raw input spells out a path after its authority.
fn has_explicit_path(raw: &str) -> bool {
    let Some(colon) = raw.find(':') else {
        return true;
    };

    let after_scheme = raw[colon + 1..].trim_start_matches(|c: char| c == '/' || c == '\\');
    match after_scheme.find(|c: char| matches!(c, '/' | '\\' | '?' | '#')) {
        Some(idx) => matches!(after_scheme.as_bytes()[idx], b'/' | b'\\'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn canon(s: &str) -> String {
        canonicalize(s).unwrap().into_string()
    }

    #[test]
    fn test_strips_fragment() {
        assert_eq!(canon("https://example.com/page#section"), "https://example.com/page");
    }

    #[test]
    fn test_sorts_query_by_key_then_value() {
        assert_eq!(
            canon("https://example.com/?b=2&a=3&a=1"),
            "https://example.com/?a=1&a=3&b=2"
        );
    }

    #[test]
    fn test_lowercases_host() {
        assert_eq!(canon("https://EXAMPLE.Com/Path"), "https://example.com/Path");
    }

    #[test]
    fn test_drops_default_ports() {
        assert_eq!(canon("http://example.com:80/x"), "http://example.com/x");
        assert_eq!(canon("https://example.com:443/x"), "https://example.com/x");
    }

    #[test]
    fn test_keeps_non_default_ports() {
        assert_eq!(canon("http://example.com:8080/x"), "http://example.com:8080/x");
        assert_eq!(canon("https://example.com:80/x"), "https://example.com:80/x");
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        assert_eq!(canon("https://example.com"), "https://example.com");
        assert_eq!(canon("https://example.com/"), "https://example.com/");
        assert_ne!(canon("https://example.com"), canon("https://example.com/"));
    }

    #[test]
    fn test_empty_path_with_query() {
        assert_eq!(canon("https://example.com?z=1&a=2"), "https://example.com?a=2&z=1");
    }

    #[test]
    fn test_empty_query_dropped() {
        assert_eq!(canon("https://example.com/x?"), "https://example.com/x");
    }

    #[test]
    fn test_keeps_userinfo() {
        assert_eq!(
            canon("https://user:pw@Example.com/x"),
            "https://user:pw@example.com/x"
        );
    }

    #[test]
    fn test_non_hierarchical_url() {
        assert_eq!(canon("mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(canon("  https://example.com/a  "), "https://example.com/a");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            canonicalize("not a url"),
            Err(CoreError::InvalidUrl { .. })
        ));
        assert!(canonicalize("").is_err());
    }

    #[test]
    fn test_idempotent_examples() {
        for raw in [
            "https://example.com",
            "https://example.com/",
            "https://example.com?b=1&a",
            "http://Example.COM:80/a/../b?x=%20y&x=a+b#frag",
            "https://example.com/caf%C3%A9?q=caf\u{e9}",
            "file:///tmp/notes.txt",
            "foo://Host:80/x?b&a",
            "mailto:a@b.c?subject=hi&body=x",
        ] {
            let once = canon(raw);
            assert_eq!(canon(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_query_sort_keeps_encoded_trailing_space() {
        assert_eq!(
            canon("https://example.com/page?a=&a=+"),
            canon("https://example.com/page?a=+&a=")
        );
    }

    #[test]
    fn test_serde_revalidates() {
        let url = canonicalize("https://example.com/?b=1&a=2").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://example.com/?a=2&b=1\"");

        let back: CanonicalUrl = serde_json::from_str("\"https://EXAMPLE.com/?b=1&a=2\"").unwrap();
        assert_eq!(back, url);

        assert!(serde_json::from_str::<CanonicalUrl>("\"nope\"").is_err());
    }

    fn query_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[a-z]{1,4}", "[a-zA-Z0-9 ]{0,4}"), 0..6)
    }

    /// Values are form-encoded so a trailing space survives as `+`.
    fn query_string(pairs: &[(String, String)]) -> String {
        pairs
            .iter()
            .map(|(k, v)| {
                let v: String = url::form_urlencoded::byte_serialize(v.as_bytes()).collect();
                format!("{k}={v}")
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(
            host in "[a-zA-Z][a-zA-Z0-9]{0,10}\\.(com|org|net)",
            path in "(/[a-zA-Z0-9._-]{0,8}){0,3}",
            pairs in query_pairs(),
            port in prop::option::of(1u16..=65535),
        ) {
            let mut raw = format!("https://{host}");
            if let Some(port) = port {
                raw.push_str(&format!(":{port}"));
            }
            raw.push_str(&path);
            if !pairs.is_empty() {
                raw.push('?');
                raw.push_str(&query_string(&pairs));
            }

            let once = canon(&raw);
            prop_assert_eq!(canon(&once), once);
        }

        #[test]
        fn query_order_does_not_matter(pairs in query_pairs(), seed in any::<u64>()) {
            let encode = |pairs: &[(String, String)]| {
                format!("https://example.com/page?{}", query_string(pairs))
            };

            let mut shuffled = pairs.clone();
            if !shuffled.is_empty() {
                let len = shuffled.len();
                shuffled.rotate_left((seed as usize) % len);
                shuffled.reverse();
            }

            prop_assert_eq!(canon(&encode(&pairs)), canon(&encode(&shuffled)));
        }
    }
}
