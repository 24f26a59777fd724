//! Rights-impact classification of dataset, bill and policy descriptions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViolationType {
    BenefitReductions,
    Deeming,
    AppealsBarriers,
    MedicalDenial,
    IncomeInadequacy,
    DiscriminatoryRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_match_count(count: usize) -> Self {
        if count >= 3 {
            Severity::Critical
        } else if count >= 2 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Citation {
    pub charter: String,
    pub treaty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViolationFlag {
    pub violation_type: ViolationType,
    /// Distinct keywords that fired, in table order
    pub matched_keywords: Vec<String>,
    pub citation: Citation,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    RequiresReview,
    PotentialViolation,
    RequiresAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    PeopleWithDisabilities,
    InjuredWorkers,
    SocialAssistanceRecipients,
    Seniors,
    IndigenousPeoples,
    Newcomers,
    LowIncomeHouseholds,
    ChildrenAndFamilies,
}

/// Classifier input: a short description of a dataset, bill or policy item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PolicyItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViolationAssessment {
    pub violations: Vec<ViolationFlag>,
    pub charter_status: ComplianceStatus,
    pub human_rights_status: ComplianceStatus,
    pub treaty_status: ComplianceStatus,
    pub impacted_populations: Vec<Population>,
}

/// Aggregate counts over many assessments, for periodic reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViolationSummary {
    pub items_analyzed: usize,
    pub items_flagged: usize,
    pub by_type: BTreeMap<ViolationType, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_population: BTreeMap<Population, usize>,
    pub potential_charter_violations: usize,
}
