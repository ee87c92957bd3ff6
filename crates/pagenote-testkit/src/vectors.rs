//! Golden test vectors for deterministic verification.
//!
//! These pin the canonical form and content address of known URLs, so that
//! every client derives the same storage path for the same page.

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct AddressVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input as a user might type or paste it.
    pub raw: &'static str,
    /// Expected canonical form.
    pub canonical: &'static str,
    /// Expected SHA-256 content address (hex).
    pub address: &'static str,
    /// Expected privacy tag, where it is pinned.
    pub tag: Option<&'static str>,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<AddressVector> {
    vec![
        AddressVector {
            name: "bare origin without trailing slash",
            raw: "https://example.com",
            canonical: "https://example.com",
            address: "100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9",
            tag: None,
        },
        AddressVector {
            name: "bare origin with trailing slash",
            raw: "https://example.com/",
            canonical: "https://example.com/",
            address: "0f115db062b7c0dd030b16878c99dea5c354b49dc37b38eb8846179c7783e9d7",
            // Unit 3 is a lone surrogate.
            tag: Some(
                "\u{110f}\u{b05d}\u{b762}\u{fffd}\u{b03}\u{8716}\u{998c}\u{a5de}\u{54c3}\u{9db4}",
            ),
        },
        AddressVector {
            name: "every normalization at once",
            raw: "HTTPS://Example.COM:443/a?b=2&a=1#frag",
            canonical: "https://example.com/a?a=1&b=2",
            address: "051029b6a13fc6686e4523427e03b3a177e6970f9bfe03b026a9a023819b902a",
            tag: None,
        },
        AddressVector {
            name: "non-default port kept",
            raw: "http://example.org:8080/path/",
            canonical: "http://example.org:8080/path/",
            address: "794be6bc9c297386c69dd8fd593c6a0b52a51b291eeac8951b5a85bad1203990",
            tag: None,
        },
        AddressVector {
            name: "plain page",
            raw: "https://www.rust-lang.org/learn",
            canonical: "https://www.rust-lang.org/learn",
            address: "23c499007623b6c80ecf72ae559ca16e935f108bedf912461b86d4811234a0c3",
            tag: None,
        },
    ]
}

/// Privacy tag of the empty string.
///
/// Its digest contains 0x24b9 (CIRCLED LATIN CAPITAL LETTER D), which the
/// lowercasing step turns into 0x24d3.
pub const EMPTY_INPUT_TAG: &str =
    "\u{b0e3}\u{42c4}\u{fc98}\u{141c}\u{fb9a}\u{c8f4}\u{6f99}\u{24d3}\u{ae27}\u{e441}";
