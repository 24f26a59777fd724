//! Authoritative-source lookups used by the corroboration engine
//!
//! Every backend answers the same question: given a claim and a registry entry, which
//! records in that source match? Network, fixture and no-op backends are interchangeable
//! behind [`SourceLookup`].

mod cached;
mod fixture;
mod http;
mod none;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;

use crate::model::{Claim, HitConfidence, LookupBackend, SourceDescriptor, SourceHit};
use crate::service::text::{context_window, truncate_chars};

pub use cached::CachedLookup;
pub use fixture::FixtureLookup;
pub use http::HttpSourceLookup;
pub use none::NoLookup;

const SNIPPET_CONTEXT_CHARS: usize = 100;
const MAX_SNIPPET_CHARS: usize = 300;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Source not queryable: {0}")]
    NotQueryable(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Query capability for one authoritative source
#[async_trait]
pub trait SourceLookup: Send + Sync {
    /// Records in `source` that match `claim`
    async fn lookup(
        &self,
        claim: &Claim,
        source: &SourceDescriptor,
    ) -> Result<Vec<SourceHit>, LookupError>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// A candidate record returned by a source, before matching
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
}

/// Search terms sent to a source: the alleged actor when known, plus the trigger phrase
pub fn search_terms(claim: &Claim) -> String {
    if claim.has_known_actor() {
        format!("{} {}", claim.alleged_actor, claim.trigger)
    } else {
        claim.trigger.clone()
    }
}

/// Score one record against a claim
///
/// Actor and trigger both present is a high-confidence match, actor alone medium,
/// trigger alone low. Records mentioning neither do not match.
pub fn match_record(
    claim: &Claim,
    source: &SourceDescriptor,
    record: &SourceRecord,
) -> Option<SourceHit> {
    let haystack = format!("{}\n{}", record.title, record.text);

    let actor = claim
        .has_known_actor()
        .then(|| find_term(&haystack, &claim.alleged_actor))
        .flatten();
    let trigger = find_term(&haystack, &claim.trigger);

    let (confidence, anchor) = match (actor, trigger) {
        (Some(a), Some(_)) => (HitConfidence::High, a),
        (Some(a), None) => (HitConfidence::Medium, a),
        (None, Some(t)) => (HitConfidence::Low, t),
        (None, None) => return None,
    };

    let snippet = context_window(&haystack, anchor.0, anchor.1, SNIPPET_CONTEXT_CHARS);

    Some(SourceHit {
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        url: if record.url.is_empty() {
            source.url.clone()
        } else {
            record.url.clone()
        },
        snippet: truncate_chars(&snippet, MAX_SNIPPET_CHARS),
        confidence,
        retrieved_at: Utc::now(),
    })
}

/// The single best match among `records`: highest confidence, first on ties
pub fn best_hit<'a>(
    claim: &Claim,
    source: &SourceDescriptor,
    records: impl IntoIterator<Item = &'a SourceRecord>,
) -> Option<SourceHit> {
    let mut best: Option<SourceHit> = None;
    for hit in records
        .into_iter()
        .filter_map(|record| match_record(claim, source, record))
    {
        if best.as_ref().is_none_or(|b| hit.confidence > b.confidence) {
            best = Some(hit);
        }
    }
    best
}

/// Case-insensitive whole-term search returning the byte span of the first occurrence
fn find_term(haystack: &str, term: &str) -> Option<(usize, usize)> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).ok()?;
    pattern.find(haystack).map(|m| (m.start(), m.end()))
}

/// Build the configured backend
pub fn build_lookup(
    backend: LookupBackend,
    fixtures_path: Option<&str>,
) -> Result<Arc<dyn SourceLookup>, LookupError> {
    let lookup: Arc<dyn SourceLookup> = match backend {
        LookupBackend::Http => Arc::new(HttpSourceLookup::new()),
        LookupBackend::Fixture => {
            let path = fixtures_path.ok_or_else(|| {
                LookupError::Fixture("fixture backend requires corroboration.fixtures_path".into())
            })?;
            Arc::new(FixtureLookup::from_path(path)?)
        }
        LookupBackend::None => Arc::new(NoLookup),
    };
    tracing::info!(backend = lookup.backend(), "Source lookup backend configured");
    Ok(lookup)
}


#[cfg(test)]
mod tests {
    use super::test_support::{claim, source};
    use super::*;
    use crate::model::{ClaimType, SourceCategory, UNKNOWN};

    fn record(title: &str, text: &str) -> SourceRecord {
        SourceRecord {
            title: title.to_string(),
            url: String::new(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_confidence_by_matched_terms() {
        let c = claim(ClaimType::Denial, "denied", "WSIB");
        let s = source("canlii", SourceCategory::Legal);

        let both = match_record(&c, &s, &record("Appeal", "The WSIB denied benefits")).unwrap();
        assert_eq!(both.confidence, HitConfidence::High);
        assert_eq!(both.url, s.url);

        let actor = match_record(&c, &s, &record("wsib annual report", "")).unwrap();
        assert_eq!(actor.confidence, HitConfidence::Medium);

        let trigger = match_record(&c, &s, &record("Claim denied", "")).unwrap();
        assert_eq!(trigger.confidence, HitConfidence::Low);

        assert!(match_record(&c, &s, &record("Unrelated", "nothing here")).is_none());
    }

    #[test]
    fn test_unknown_actor_never_matches_placeholder() {
        let c = claim(ClaimType::Fraud, "fraud", UNKNOWN);
        let s = source("oag", SourceCategory::Oversight);
        assert!(match_record(&c, &s, &record("unknown vendor", "")).is_none());
        assert_eq!(search_terms(&c), "fraud");
    }

    #[test]
    fn test_best_hit_prefers_confidence_then_order() {
        let c = claim(ClaimType::Denial, "denied", "WSIB");
        let s = source("canlii", SourceCategory::Legal);
        let records = vec![
            record("first low", "claim denied"),
            record("medium", "WSIB statement"),
            record("second medium", "WSIB again"),
        ];
        let hit = best_hit(&c, &s, &records).unwrap();
        assert_eq!(hit.confidence, HitConfidence::Medium);
        assert!(hit.snippet.starts_with("medium"));
    }

    #[test]
    fn test_search_terms_include_actor() {
        let c = claim(ClaimType::Denial, "denied", "WSIB");
        assert_eq!(search_terms(&c), "WSIB denied");
    }

    #[test]
    fn test_fixture_backend_requires_path() {
        assert!(matches!(
            build_lookup(LookupBackend::Fixture, None),
            Err(LookupError::Fixture(_))
        ));
    }
}
