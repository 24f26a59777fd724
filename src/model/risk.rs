use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            Priority::Critical
        } else if score >= 50 {
            Priority::High
        } else if score >= 30 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// CRITICAL and HIGH trigger FOI, oversight and media actions
    pub fn is_escalated(&self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// 0–100, capped
    pub score: u32,
    /// One entry per contributing factor, in rubric order
    pub reasons: Vec<String>,
    pub priority: Priority,
}
