use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Denial,
    Fraud,
    Abuse,
    Negligence,
    Pattern,
    Violation,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Denial => "denial",
            ClaimType::Fraud => "fraud",
            ClaimType::Abuse => "abuse",
            ClaimType::Negligence => "negligence",
            ClaimType::Pattern => "pattern",
            ClaimType::Violation => "violation",
        }
    }

    /// Fraud and abuse weigh heaviest in risk scoring
    pub fn is_critical(&self) -> bool {
        matches!(self, ClaimType::Fraud | ClaimType::Abuse)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum EvidenceStrength {
    Low,
    Medium,
    High,
}

impl EvidenceStrength {
    pub fn from_points(points: u32) -> Self {
        if points >= 70 {
            EvidenceStrength::High
        } else if points >= 40 {
            EvidenceStrength::Medium
        } else {
            EvidenceStrength::Low
        }
    }
}

/// A single textual sighting of an allegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    pub claim_type: ClaimType,
    /// The phrase that matched the rule table
    pub trigger: String,
    /// Character offset of the trigger in the document
    pub offset: usize,
    /// Up to 200 characters of context on each side of the trigger
    pub excerpt: String,
    /// Nearest organization or person in the excerpt, `"unknown"` when none
    pub alleged_actor: String,
    /// `"unknown"` when no victim role is mentioned
    pub alleged_victim: String,
    /// First date mentioned in the excerpt, `"unknown"` when none
    pub event_date: String,
    pub evidence_points: u32,
    pub evidence_strength: EvidenceStrength,
}

impl Claim {
    pub fn has_known_actor(&self) -> bool {
        self.alleged_actor != crate::model::UNKNOWN
    }
}
