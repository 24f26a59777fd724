use std::sync::Arc;

use async_trait::async_trait;

use super::{LookupError, SourceLookup};
use crate::model::{Claim, SourceDescriptor, SourceHit};
use crate::service::cache::{CacheError, LookupCache};
use crate::service::cache_keys::lookup_cache_key;

/// Read-through cache in front of another backend
///
/// Only successful lookups are stored, so an unavailable source is retried on the
/// next request. Cache failures fall through to the inner backend.
pub struct CachedLookup {
    inner: Arc<dyn SourceLookup>,
    cache: LookupCache,
    registry_version: String,
}

impl CachedLookup {
    pub fn new(inner: Arc<dyn SourceLookup>, cache: LookupCache, registry_version: &str) -> Self {
        Self {
            inner,
            cache,
            registry_version: registry_version.to_string(),
        }
    }
}

#[async_trait]
impl SourceLookup for CachedLookup {
    async fn lookup(
        &self,
        claim: &Claim,
        source: &SourceDescriptor,
    ) -> Result<Vec<SourceHit>, LookupError> {
        let key = lookup_cache_key(&self.registry_version, source, claim);

        match self.cache.get_lookup::<Vec<SourceHit>>(&key).await {
            Ok(hits) => {
                tracing::debug!(source = %source.id, "Lookup cache hit");
                return Ok(hits);
            }
            Err(CacheError::Miss(_)) => {}
            Err(e) => tracing::warn!(error = %e, "Lookup cache read failed"),
        }

        let hits = self.inner.lookup(claim, source).await?;

        if let Err(e) = self.cache.set_lookup(&key, &hits).await {
            tracing::warn!(error = %e, "Failed to cache lookup result");
        }

        Ok(hits)
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}
