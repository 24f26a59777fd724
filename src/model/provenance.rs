use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    DirectIngestion,
    CrossReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProvenanceEntry {
    pub source: String,
    pub url: String,
    pub snippet: String,
    pub retrieved_at: DateTime<Utc>,
    pub verification: VerificationMethod,
    /// Claim this entry corroborates; absent for the original document
    pub claim_index: Option<usize>,
}
