//! Recommended follow-up actions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A drafted freedom-of-information request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FoiRequest {
    pub target_office: String,
    pub subject: String,
    pub time_range: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OversightNotification {
    pub bodies: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaAlert {
    /// Public statement, at most 280 characters
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvidenceChecklist {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvestigationFlag {
    pub reason: String,
    /// Excerpts of the weakly corroborated claims
    pub claims: Vec<String>,
}

/// Next step handed to a human operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    FileFoiRequest(FoiRequest),
    NotifyOversightBody(OversightNotification),
    PrepareMediaAlert(MediaAlert),
    BuildEvidenceChecklist(EvidenceChecklist),
    FlagForFurtherInvestigation(InvestigationFlag),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::FileFoiRequest(_) => "file_foi_request",
            Action::NotifyOversightBody(_) => "notify_oversight_body",
            Action::PrepareMediaAlert(_) => "prepare_media_alert",
            Action::BuildEvidenceChecklist(_) => "build_evidence_checklist",
            Action::FlagForFurtherInvestigation(_) => "flag_for_further_investigation",
        }
    }
}
