//! Redis cache for corroboration lookups

use std::env;

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

const ENV_REDIS_HOST: &str = "EVIDENCE_INTEL_REDIS_HOST";
const ENV_REDIS_PORT: &str = "EVIDENCE_INTEL_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "EVIDENCE_INTEL_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "EVIDENCE_INTEL_REDIS_DB";
const ENV_CACHE_TTL: &str = "EVIDENCE_INTEL_CACHE_TTL";

const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";
const DEFAULT_TTL_SECONDS: u64 = 6 * 60 * 60; // 6 hours

const PREFIX_LOOKUP: &str = "lookup:";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache miss for key: {0}")]
    Miss(String),
}

/// Connection settings read from `EVIDENCE_INTEL_REDIS_*` and `EVIDENCE_INTEL_CACHE_TTL`
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheSettings {
    host: String,
    port: String,
    password: Option<String>,
    db: String,
    ttl_seconds: u64,
}

impl CacheSettings {
    fn from_env() -> Self {
        Self {
            host: env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string()),
            port: env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string()),
            password: env::var(ENV_REDIS_PASSWORD).ok().filter(|p| !p.is_empty()),
            db: env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string()),
            ttl_seconds: env::var(ENV_CACHE_TTL)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
        }
    }

    /// `redis://[:password@]host:port/db`
    fn redis_url(&self) -> String {
        match &self.password {
            Some(pwd) => format!("redis://:{pwd}@{}:{}/{}", self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

/// Redis-backed cache of source lookup results
///
/// Values are JSON under `lookup:<key hash>` and expire after the configured TTL, so a
/// registry or source update is picked up without a flush.
#[derive(Clone)]
pub struct LookupCache {
    client: Client,
    ttl_seconds: u64,
}

impl LookupCache {
    /// Connect using environment settings and verify the server answers
    pub async fn new() -> Result<Self, CacheError> {
        let settings = CacheSettings::from_env();
        tracing::debug!(host = %settings.host, port = %settings.port, db = %settings.db, "Connecting to Redis");

        let cache = Self {
            client: Client::open(settings.redis_url())?,
            ttl_seconds: settings.ttl_seconds,
        };
        cache.ping().await?;

        tracing::info!(
            host = %settings.host,
            port = %settings.port,
            ttl = settings.ttl_seconds,
            "Redis connection established"
        );
        Ok(cache)
    }

    /// Cached hits for a lookup key; `CacheError::Miss` when absent
    pub async fn get_lookup<T: DeserializeOwned>(&self, key_hash: &str) -> Result<T, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(lookup_key(key_hash)).await?;

        let json = stored.ok_or_else(|| CacheError::Miss(key_hash.to_string()))?;
        serde_json::from_str(&json).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    pub async fn set_lookup<T: Serialize>(&self, key_hash: &str, hits: &T) -> Result<(), CacheError> {
        let json =
            serde_json::to_string(hits).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let key = lookup_key(key_hash);

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&key, json, self.ttl_seconds).await?;

        tracing::debug!(key = %key, ttl = self.ttl_seconds, "Cached lookup hits");
        Ok(())
    }

    /// Round-trip a PING; also used by the readiness probe
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

fn lookup_key(key_hash: &str) -> String {
    format!("{PREFIX_LOOKUP}{key_hash}")
}
