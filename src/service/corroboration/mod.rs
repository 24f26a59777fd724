//! Corroboration engine
//!
//! For each claim, selects the relevant registry sources and queries them through the
//! configured [`SourceLookup`]. All (claim, source) lookups of one document share a
//! bounded pool of in-flight requests; results come back in claim order. A source that
//! errors or exceeds the lookup timeout counts as zero hits and never fails the document.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;

use crate::model::{
    Claim, CorroborationResult, SourceCategory, SourceDescriptor, SourceFilterConfig,
    SourceHit, SourceRegistry,
};
use crate::sources::SourceLookup;

pub mod registry;

pub use registry::{REGISTRY_VERSION, default_registry};

/// Lookups allowed in flight at once for one document
pub const DEFAULT_MAX_IN_FLIGHT_LOOKUPS: usize = 8;

pub struct CorroborationEngine {
    lookup: Arc<dyn SourceLookup>,
    registry: SourceRegistry,
    filter: SourceFilterConfig,
    lookup_timeout: Duration,
    max_in_flight: usize,
}

impl CorroborationEngine {
    pub fn new(
        lookup: Arc<dyn SourceLookup>,
        registry: SourceRegistry,
        filter: SourceFilterConfig,
        lookup_timeout: Duration,
    ) -> Self {
        if !filter.allow.is_empty() {
            tracing::info!(allow = ?filter.allow, "Source whitelist configured");
        }
        if !filter.deny.is_empty() {
            tracing::info!(deny = ?filter.deny, "Source blacklist configured");
        }

        Self {
            lookup,
            registry,
            filter,
            lookup_timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT_LOOKUPS,
        }
    }

    /// Bound the number of concurrent lookups per document (at least one)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &'static str {
        self.lookup.backend()
    }

    /// Registry sources worth checking for `claim`, in registry order
    ///
    /// Legal sources are always checked. Oversight sources are checked for the claim
    /// types they take complaints on. Any source whose subjects cover the alleged actor
    /// is checked too.
    pub fn relevant_sources(&self, claim: &Claim) -> Vec<&SourceDescriptor> {
        self.registry
            .sources
            .iter()
            .filter(|source| source.queryable && self.filter.is_allowed(&source.url))
            .filter(|source| {
                source.category == SourceCategory::Legal
                    || (source.category == SourceCategory::Oversight
                        && source.claim_types.contains(&claim.claim_type))
                    || (claim.has_known_actor() && source.covers_actor(&claim.alleged_actor))
            })
            .collect()
    }

    /// One result per claim, in claim order
    pub async fn corroborate(&self, claims: &[Claim]) -> Vec<CorroborationResult> {
        let jobs: Vec<(usize, &SourceDescriptor)> = claims
            .iter()
            .enumerate()
            .flat_map(|(index, claim)| {
                self.relevant_sources(claim)
                    .into_iter()
                    .map(move |source| (index, source))
            })
            .collect();

        tracing::debug!(
            claims = claims.len(),
            lookups = jobs.len(),
            max_in_flight = self.max_in_flight,
            "Corroborating claims"
        );

        // `buffered` keeps job order, so outcomes stay grouped by claim
        let outcomes: Vec<_> = stream::iter(jobs)
            .map(|(index, source)| async move {
                let outcome = timeout(self.lookup_timeout, self.lookup.lookup(&claims[index], source)).await;
                (index, source, outcome)
            })
            .buffered(self.max_in_flight)
            .collect()
            .await;

        let mut results: Vec<ClaimOutcome> = (0..claims.len()).map(|_| ClaimOutcome::default()).collect();

        for (index, source, outcome) in outcomes {
            let result = &mut results[index];
            result.checked.push(source.id.clone());
            match outcome {
                // at most one hit per source
                Ok(Ok(found)) => result.hits.extend(found.into_iter().take(1)),
                Ok(Err(e)) => {
                    tracing::warn!(source = %source.id, claim = index, error = %e, "Source lookup failed");
                    result.unavailable.push(source.id.clone());
                }
                Err(_) => {
                    tracing::warn!(
                        source = %source.id,
                        claim = index,
                        timeout_ms = self.lookup_timeout.as_millis() as u64,
                        "Source lookup timed out"
                    );
                    result.unavailable.push(source.id.clone());
                }
            }
        }

        results
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                CorroborationResult::new(index, outcome.hits, outcome.checked, outcome.unavailable)
            })
            .collect()
    }
}

#[derive(Default)]
struct ClaimOutcome {
    hits: Vec<SourceHit>,
    checked: Vec<String>,
    unavailable: Vec<String>,
}
