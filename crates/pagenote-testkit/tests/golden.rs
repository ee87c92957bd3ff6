//! Golden vectors for canonical forms, content addresses and tags.

use pagenote::{content_address, privacy_tag};
use pagenote_core::{canonicalize, ContentAddress, PrivacyTag};
use pagenote_testkit::vectors::{all_vectors, EMPTY_INPUT_TAG};

#[test]
fn test_golden_vectors() {
    for vector in all_vectors() {
        let canonical = canonicalize(vector.raw).unwrap();
        assert_eq!(canonical.as_str(), vector.canonical, "canonical form: {}", vector.name);

        assert_eq!(
            ContentAddress::of(&canonical).to_hex(),
            vector.address,
            "address: {}",
            vector.name
        );
        assert_eq!(content_address(vector.raw).unwrap().to_hex(), vector.address);

        let tag = privacy_tag(vector.raw);
        assert_eq!(tag.as_str().chars().count(), PrivacyTag::LEN, "tag length: {}", vector.name);
        if let Some(expected) = vector.tag {
            assert_eq!(tag.as_str(), expected, "tag: {}", vector.name);
        }
    }
}

#[test]
fn test_empty_input_tag() {
    assert_eq!(privacy_tag("").as_str(), EMPTY_INPUT_TAG);
    assert_eq!(PrivacyTag::derive("").as_str(), EMPTY_INPUT_TAG);
}

#[test]
fn test_trailing_slash_changes_address() {
    let vectors = all_vectors();
    assert_ne!(vectors[0].address, vectors[1].address);
}
