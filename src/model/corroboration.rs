use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::ClaimType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Official,
    Oversight,
    Legal,
    Data,
    Legislative,
}

/// How an authoritative source is queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryMethod {
    /// JSON search API, queried with `?q=`
    Api { endpoint: String },
    /// HTML search page; `{query}` in the template is replaced by the encoded query
    SearchPage { url_template: String },
    Rss { feed_url: String },
}

/// Registry entry describing one authoritative source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    pub category: SourceCategory,
    pub url: String,
    pub query: QueryMethod,
    pub queryable: bool,
    /// Organization keywords this source covers (matched against the alleged actor)
    pub subjects: Vec<String>,
    /// Claim types an oversight body takes complaints for
    pub claim_types: Vec<ClaimType>,
}

impl SourceDescriptor {
    pub fn covers_actor(&self, actor: &str) -> bool {
        let actor = actor.to_lowercase();
        self.subjects
            .iter()
            .any(|subject| actor.contains(&subject.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceRegistry {
    pub version: String,
    pub sources: Vec<SourceDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HitConfidence {
    Low,
    Medium,
    High,
}

/// A matching record found in an authoritative source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceHit {
    pub source_id: String,
    pub source_name: String,
    pub url: String,
    pub snippet: String,
    pub confidence: HitConfidence,
    pub retrieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorroborationLevel {
    Strong,
    Moderate,
    Weak,
}

impl CorroborationLevel {
    pub fn from_hit_count(hits: usize) -> Self {
        match hits {
            0 => CorroborationLevel::Weak,
            1 => CorroborationLevel::Moderate,
            _ => CorroborationLevel::Strong,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CorroborationResult {
    /// Index of the claim in the report's claim list
    pub claim_index: usize,
    pub hits: Vec<SourceHit>,
    pub level: CorroborationLevel,
    pub needs_further_investigation: bool,
    /// Sources selected as relevant for this claim
    pub sources_checked: Vec<String>,
    /// Sources that errored or timed out (counted as zero hits)
    pub sources_unavailable: Vec<String>,
}

impl CorroborationResult {
    pub fn new(
        claim_index: usize,
        hits: Vec<SourceHit>,
        sources_checked: Vec<String>,
        sources_unavailable: Vec<String>,
    ) -> Self {
        let level = CorroborationLevel::from_hit_count(hits.len());
        Self {
            claim_index,
            hits,
            level,
            needs_further_investigation: level == CorroborationLevel::Weak,
            sources_checked,
            sources_unavailable,
        }
    }

    pub fn is_weak(&self) -> bool {
        self.level == CorroborationLevel::Weak
    }
}
