//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection.

use std::sync::Arc;

use crate::model::Config;
use crate::service::corroboration::{REGISTRY_VERSION, default_registry};
use crate::service::{
    AnalysisService, ClaimRuleSet, CorroborationEngine, LookupCache, ViolationRuleSet,
};
use crate::sources::{CachedLookup, LookupError, SourceLookup, build_lookup};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Redis cache (optional)
    pub cache: Option<LookupCache>,
    /// Document analysis and violation classification
    pub analysis_service: Arc<AnalysisService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Redis cache initialization (optional)
    /// 2. Source lookup backend construction, wrapped in the cache when available
    /// 3. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize Redis cache (optional - will log warning if Redis is unavailable)
        let cache = match LookupCache::new().await {
            Ok(cache) => {
                tracing::info!("Redis cache enabled");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                None
            }
        };

        let lookup = Self::build_source_lookup(&config, cache.clone())?;

        let corroboration = CorroborationEngine::new(
            lookup,
            default_registry(),
            config.sources,
            config.corroboration.lookup_timeout(),
        )
        .with_max_in_flight(config.corroboration.max_concurrent_lookups);

        let analysis_service = Arc::new(AnalysisService::new(
            corroboration,
            ClaimRuleSet::default(),
            ViolationRuleSet::default(),
            config.analysis.deadline(),
        ));

        Ok(Self {
            cache,
            analysis_service,
        })
    }

    /// Build the configured lookup backend, behind the cache when one is available
    fn build_source_lookup(
        config: &Config,
        cache: Option<LookupCache>,
    ) -> Result<Arc<dyn SourceLookup>, AppError> {
        let lookup = build_lookup(
            config.corroboration.backend,
            config.corroboration.fixtures_path.as_deref(),
        )?;

        Ok(match cache {
            Some(cache) => Arc::new(CachedLookup::new(lookup, cache, REGISTRY_VERSION)),
            None => lookup,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Source lookup backend could not be constructed
    #[error("Source lookup initialization failed: {0}")]
    LookupInit(#[from] LookupError),
}
