//! Claim rule table
//!
//! Ordered list of phrase groups mapped to claim types. New categories are added by
//! extending the table (or building a custom [`ClaimRuleSet`]); extraction logic does
//! not change.

use regex::Regex;

use crate::model::ClaimType;

/// One row of the claim table
#[derive(Debug, Clone)]
pub struct ClaimRule {
    pub claim_type: ClaimType,
    pub phrases: &'static [&'static str],
}

pub const DEFAULT_CLAIM_RULES: &[ClaimRule] = &[
    ClaimRule {
        claim_type: ClaimType::Denial,
        phrases: &["denied", "rejected", "refused"],
    },
    ClaimRule {
        claim_type: ClaimType::Fraud,
        phrases: &["fraud", "corruption", "bribe"],
    },
    ClaimRule {
        claim_type: ClaimType::Abuse,
        phrases: &["abuse", "harassment", "discrimination"],
    },
    ClaimRule {
        claim_type: ClaimType::Negligence,
        phrases: &["negligence", "failure to", "failed to"],
    },
    ClaimRule {
        claim_type: ClaimType::Pattern,
        phrases: &["systemic", "pattern of", "repeatedly"],
    },
    ClaimRule {
        claim_type: ClaimType::Violation,
        phrases: &["violation", "breach", "illegal"],
    },
];

/// Victim-role keywords, singular form first
pub const VICTIM_ROLES: &[&str] = &["worker", "claimant", "recipient", "patient", "employee"];

/// A claim rule compiled to a case-insensitive whole-phrase regex
#[derive(Debug, Clone)]
pub struct CompiledClaimRule {
    pub claim_type: ClaimType,
    pub pattern: Regex,
}

/// Compiled, swappable claim table
#[derive(Debug, Clone)]
pub struct ClaimRuleSet {
    rules: Vec<CompiledClaimRule>,
    victims: Regex,
}

impl ClaimRuleSet {
    pub fn new(rules: &[ClaimRule], victim_roles: &[&str]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                let alternation = rule
                    .phrases
                    .iter()
                    .map(|phrase| regex::escape(phrase))
                    .collect::<Vec<_>>()
                    .join("|");
                Ok(CompiledClaimRule {
                    claim_type: rule.claim_type,
                    pattern: Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let roles = victim_roles
            .iter()
            .map(|role| regex::escape(role))
            .collect::<Vec<_>>()
            .join("|");
        let victims = Regex::new(&format!(r"(?i)\b({roles})s?\b"))?;

        Ok(Self { rules, victims })
    }

    pub fn rules(&self) -> &[CompiledClaimRule] {
        &self.rules
    }

    pub fn victim_pattern(&self) -> &Regex {
        &self.victims
    }
}

impl Default for ClaimRuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_CLAIM_RULES, VICTIM_ROLES).expect("built-in claim rules compile")
    }
}
