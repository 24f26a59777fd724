//! Offline backend answering from a YAML file of pre-fetched records
//!
//! ```yaml
//! - source_id: ombudsman-on
//!   title: Investigation into WSIB claim handling
//!   url: https://www.ombudsman.on.ca/...
//!   text: The Ombudsman found the WSIB denied benefits without review.
//! ```

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{LookupError, SourceLookup, SourceRecord, best_hit};
use crate::model::{Claim, SourceDescriptor, SourceHit};

#[derive(Debug, Clone, Deserialize)]
struct FixtureRecord {
    source_id: String,
    #[serde(flatten)]
    record: SourceRecord,
}

/// Hits are stamped with the load time so replays of the same file are identical
pub struct FixtureLookup {
    records: Vec<FixtureRecord>,
    loaded_at: DateTime<Utc>,
}

impl FixtureLookup {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| LookupError::Fixture(format!("{}: {e}", path.display())))?;
        let lookup = Self::from_yaml(&contents)?;
        tracing::info!(
            path = %path.display(),
            records = lookup.records.len(),
            "Loaded corroboration fixtures"
        );
        Ok(lookup)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, LookupError> {
        let records: Vec<FixtureRecord> =
            serde_yaml::from_str(contents).map_err(|e| LookupError::Fixture(e.to_string()))?;
        Ok(Self {
            records,
            loaded_at: Utc::now(),
        })
    }
}

#[async_trait]
impl SourceLookup for FixtureLookup {
    async fn lookup(
        &self,
        claim: &Claim,
        source: &SourceDescriptor,
    ) -> Result<Vec<SourceHit>, LookupError> {
        let records = self
            .records
            .iter()
            .filter(|r| r.source_id == source.id)
            .map(|r| &r.record);
        Ok(best_hit(claim, source, records)
            .map(|hit| SourceHit {
                retrieved_at: self.loaded_at,
                ..hit
            })
            .into_iter()
            .collect())
    }

    fn backend(&self) -> &'static str {
        "fixture"
    }
}
