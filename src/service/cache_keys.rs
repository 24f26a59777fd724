//! Cache key and report id hashing

use sha2::{Digest, Sha256};

use crate::model::{Claim, SourceDescriptor};

/// Cache key hash for one (claim, source) lookup
///
/// The key is based on:
/// - registry version (a registry change invalidates every entry)
/// - source id
/// - claim type
/// - alleged actor
/// - trigger phrase, lowercased
pub fn lookup_cache_key(registry_version: &str, source: &SourceDescriptor, claim: &Claim) -> String {
    let key_components = format!(
        "{}|{}|{}|{}|{}",
        registry_version,
        source.id,
        claim.claim_type,
        claim.alleged_actor,
        claim.trigger.to_lowercase()
    );
    hash_string(&key_components)
}

/// Content hash used as the stable half of a report id
///
/// The source is length-prefixed so the boundary between source and text is unambiguous.
pub fn content_hash(source: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update((source.len() as u64).to_be_bytes());
    hasher.update(source.as_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash a string to a hex string using SHA256
fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClaimType, SourceCategory};
    use crate::sources::test_support::{claim, source};

    #[test]
    fn test_key_varies_by_version_and_source() {
        let c = claim(ClaimType::Denial, "Denied", "WSIB");
        let a = source("a", SourceCategory::Legal);
        let b = source("b", SourceCategory::Legal);

        let base = lookup_cache_key("1", &a, &c);
        assert_eq!(base.len(), 64);
        assert_eq!(base, lookup_cache_key("1", &a, &claim(ClaimType::Denial, "denied", "WSIB")));
        assert_ne!(base, lookup_cache_key("2", &a, &c));
        assert_ne!(base, lookup_cache_key("1", &b, &c));
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash("doc", "text"), content_hash("doc", "text"));
        assert_ne!(content_hash("doc", "text"), content_hash("doc2", "text"));
    }

    #[test]
    fn test_content_hash_keeps_source_text_boundary() {
        assert_ne!(content_hash("ab", "c"), content_hash("a", "bc"));
        assert_ne!(content_hash("", "abc"), content_hash("abc", ""));
    }
}
