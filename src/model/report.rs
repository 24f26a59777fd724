use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    Action, Claim, CorroborationResult, ExtractedEntities, Metadata, Priority, ProvenanceEntry,
    Relationship,
};

/// The durable per-document output of the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReport {
    /// Content hash plus timestamp; opaque to callers
    pub id: String,
    pub metadata: Metadata,
    pub entities: ExtractedEntities,
    pub relationships: Vec<Relationship>,
    pub claims: Vec<Claim>,
    pub corroboration: Vec<CorroborationResult>,
    pub risk_score: u32,
    pub risk_explanation: Vec<String>,
    pub priority: Priority,
    pub suggested_actions: Vec<Action>,
    pub provenance: Vec<ProvenanceEntry>,
    pub processing_time_ms: u64,
    pub processed_at: DateTime<Utc>,
}
