//! Content addresses and privacy tags.
//!
//! Both are derived from the SHA-256 digest of a canonical URL:
//!
//! - [`ContentAddress`] is the full digest as lowercase hex. It names the
//!   object a user writes to their own store, so peers can read it directly.
//! - [`PrivacyTag`] packs the first 160 bits of the digest into 10 UTF-16
//!   code units. It is what the central index sees instead of the URL.
//!
//! Neither allows recovering the URL.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::canonical::CanonicalUrl;
use crate::error::{CoreError, Result};

/// A 32-byte SHA-256 content address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentAddress(pub [u8; 32]);

impl ContentAddress {
    /// Address a canonical URL.
    pub fn of(url: &CanonicalUrl) -> Self {
        Self::digest(url.as_str().as_bytes())
    }

    /// SHA-256 of arbitrary bytes.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidAddress(format!("expected 32 bytes: {s}")))?;
        Ok(Self(arr))
    }

    /// Filename of the record stored at this address.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.to_hex())
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for ContentAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ContentAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<String> for ContentAddress {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<ContentAddress> for String {
    fn from(address: ContentAddress) -> Self {
        address.to_hex()
    }
}

/// A 10-character, one-way tag for querying the central index.
///
/// Built from the first 20 bytes of the SHA-256 digest: each little-endian
/// byte pair becomes one UTF-16 code unit, and each resulting character is
/// lowercased. Surrogate code units cannot stand alone in a `String` and
/// become U+FFFD. Lowercasing keeps only the first character of the mapping,
/// so the tag is always exactly [`PrivacyTag::LEN`] characters.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivacyTag(String);

impl PrivacyTag {
    /// Number of characters in every tag.
    pub const LEN: usize = 10;

    /// Tag an arbitrary string. Total: works for any input, including `""`.
    pub fn derive(input: &str) -> Self {
        let digest = Sha256::digest(input.as_bytes());

        let tag = digest[..2 * Self::LEN]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .map(|unit| char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect();

        Self(tag)
    }

    /// Tag a canonical URL.
    pub fn for_url(url: &CanonicalUrl) -> Self {
        Self::derive(url.as_str())
    }

    /// Borrow the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivacyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivacyTag({:?})", self.0)
    }
}

impl fmt::Display for PrivacyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PrivacyTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use proptest::prelude::*;

    #[test]
    fn test_address_known_value() {
        let url = canonicalize("https://example.com").unwrap();
        assert_eq!(
            ContentAddress::of(&url).to_hex(),
            "100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9"
        );
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let address = ContentAddress::from_bytes([0x42; 32]);
        let recovered = ContentAddress::from_hex(&address.to_hex()).unwrap();
        assert_eq!(address, recovered);
        assert!(ContentAddress::from_hex("abcd").is_err());
    }

    #[test]
    fn test_address_file_name() {
        let address = ContentAddress::from_bytes([0xab; 32]);
        assert_eq!(address.file_name(), format!("{}.json", "ab".repeat(32)));
    }

    #[test]
    fn test_address_debug() {
        let debug = format!("{:?}", ContentAddress::from_bytes([0xcd; 32]));
        assert_eq!(debug, "ContentAddress(cdcdcdcd...)");
    }

    #[test]
    fn test_empty_input_tag() {
        // Digest of "" contains 0x24b9 (CIRCLED LATIN CAPITAL LETTER D), which lowercases.
        let tag = PrivacyTag::derive("");
        assert_eq!(
            tag.as_str(),
            "\u{b0e3}\u{42c4}\u{fc98}\u{141c}\u{fb9a}\u{c8f4}\u{6f99}\u{24d3}\u{ae27}\u{e441}"
        );
    }

    #[test]
    fn test_surrogate_units_replaced() {
        // Digest of "https://example.com/" has 0xddc0 at unit 3.
        let tag = PrivacyTag::derive("https://example.com/");
        assert_eq!(tag.as_str().chars().nth(3), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(tag.as_str().chars().count(), PrivacyTag::LEN);
    }

    proptest! {
        #[test]
        fn tag_is_always_ten_lowercase_chars(input in ".*") {
            let tag = PrivacyTag::derive(&input);
            prop_assert_eq!(tag.as_str().chars().count(), PrivacyTag::LEN);
            prop_assert_eq!(tag.as_str().to_lowercase(), tag.as_str());
        }

        #[test]
        fn tag_and_address_are_deterministic(input in ".*") {
            prop_assert_eq!(PrivacyTag::derive(&input), PrivacyTag::derive(&input));
            prop_assert_eq!(
                ContentAddress::digest(input.as_bytes()),
                ContentAddress::digest(input.as_bytes())
            );
        }
    }
}
