//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pagenote_core::{canonicalize, Identity, Record};

/// A lowercase DNS-ish host.
pub fn host() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}\\.(com|org|net|test)"
}

/// Zero to three path segments, each with a leading slash.
pub fn path() -> impl Strategy<Value = String> {
    "(/[a-zA-Z0-9._~-]{0,8}){0,3}"
}

/// Query parameters as raw `(key, value)` pairs.
pub fn query_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,4}", "[a-zA-Z0-9]{0,4}"), 0..5)
}

/// A fragment, possibly absent.
pub fn fragment() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9-]{0,8}")
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// An absolute http(s) URL string.
pub fn http_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        host(),
        prop::option::of(1u16..=65535),
        path(),
        query_pairs(),
        fragment(),
    )
        .prop_map(|(scheme, host, port, path, pairs, fragment)| {
            let mut url = format!("{scheme}://{host}");
            if let Some(port) = port {
                url.push_str(&format!(":{port}"));
            }
            url.push_str(&path);
            if !pairs.is_empty() {
                url.push('?');
                url.push_str(&encode_query(&pairs));
            }
            if let Some(fragment) = fragment {
                url.push('#');
                url.push_str(&fragment);
            }
            url
        })
}

/// Two spellings of the same page that must canonicalize identically.
///
/// The second differs from the first in host case, an explicit default
/// port, query parameter order and fragment.
pub fn url_variants() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![Just(("http", 80u16)), Just(("https", 443u16))],
        host(),
        "(/[a-z0-9]{1,6}){1,3}",
        query_pairs(),
        fragment(),
        any::<bool>(),
    )
        .prop_map(|((scheme, port), host, path, pairs, fragment, explicit_port)| {
            let plain = format!("{scheme}://{host}{path}?{}", encode_query(&pairs));

            let mut reversed = pairs.clone();
            reversed.reverse();
            let authority = if explicit_port {
                format!("{}:{port}", host.to_uppercase())
            } else {
                host.to_uppercase()
            };
            let mut variant = format!("{scheme}://{authority}{path}?{}", encode_query(&reversed));
            if let Some(fragment) = fragment {
                variant.push('#');
                variant.push_str(&fragment);
            }

            (plain, variant)
        })
}

/// A peer identity with a store under `https://<name>.pods.test/`.
pub fn identity() -> impl Strategy<Value = Identity> {
    "[a-z]{1,8}".prop_map(|name| crate::fixtures::TestNetwork::identity(&name))
}

/// Tags, possibly with blanks and duplicates.
pub fn tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,6}", 0..5)
}

/// A timestamp, zero included as "unknown".
pub fn created_at() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), 1i64..=4_102_444_800_000]
}

/// A link record about a generated URL.
pub fn record() -> impl Strategy<Value = Record> {
    (http_url(), tags(), "[ -~]{0,20}", created_at()).prop_filter_map(
        "URL must canonicalize",
        |(url, tags, note, created_at)| {
            canonicalize(&url)
                .ok()
                .map(|content| Record::link(content, tags, note, created_at))
        },
    )
}
