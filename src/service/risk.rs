//! Risk scoring
//!
//! Additive rubric over five factors. Each factor that fires adds its weight and one
//! reason line, in rubric order; the total is capped at 100. No factor subtracts.

use crate::model::{Claim, ClaimType, CorroborationLevel, CorroborationResult, Priority, RiskAssessment};
use crate::service::patterns;

const MAX_SCORE: u32 = 100;

pub const CRITICAL_CLAIM_POINTS: u32 = 30;
pub const MONETARY_POINTS: u32 = 20;
pub const STRONG_CORROBORATION_POINTS: u32 = 25;
pub const PATTERN_POINTS: u32 = 15;
pub const SAFETY_POINTS: u32 = 10;

pub const REASON_CRITICAL: &str = "Critical allegations (fraud or abuse) present";
pub const REASON_MONETARY: &str = "Monetary amounts involved";
pub const REASON_CORROBORATED: &str = "Strongly corroborated by multiple authoritative sources";
pub const REASON_PATTERN: &str = "Pattern of systemic behaviour alleged";
pub const REASON_SAFETY: &str = "Public safety or harm language present";

/// Score a document's claims and their corroboration
pub fn score_risk(claims: &[Claim], corroboration: &[CorroborationResult]) -> RiskAssessment {
    let factors = [
        (
            claims.iter().any(|c| c.claim_type.is_critical()),
            CRITICAL_CLAIM_POINTS,
            REASON_CRITICAL,
        ),
        (
            claims.iter().any(|c| patterns::contains_currency(&c.excerpt)),
            MONETARY_POINTS,
            REASON_MONETARY,
        ),
        (
            corroboration
                .iter()
                .any(|r| r.level == CorroborationLevel::Strong),
            STRONG_CORROBORATION_POINTS,
            REASON_CORROBORATED,
        ),
        (
            claims.iter().any(|c| c.claim_type == ClaimType::Pattern),
            PATTERN_POINTS,
            REASON_PATTERN,
        ),
        (
            claims
                .iter()
                .any(|c| patterns::SAFETY_LANGUAGE.is_match(&c.excerpt)),
            SAFETY_POINTS,
            REASON_SAFETY,
        ),
    ];

    let mut score = 0;
    let mut reasons = Vec::new();
    for (fired, points, reason) in factors {
        if fired {
            score += points;
            reasons.push(reason.to_string());
        }
    }
    let score = score.min(MAX_SCORE);

    RiskAssessment {
        score,
        reasons,
        priority: Priority::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{HitConfidence, SourceHit, UNKNOWN};
    use crate::sources::test_support::claim;

    fn with_excerpt(claim_type: ClaimType, excerpt: &str) -> Claim {
        let mut c = claim(claim_type, "x", UNKNOWN);
        c.excerpt = excerpt.to_string();
        c
    }

    fn result(index: usize, hits: usize) -> CorroborationResult {
        let hits = (0..hits)
            .map(|i| SourceHit {
                source_id: format!("s{i}"),
                source_name: format!("Source {i}"),
                url: String::new(),
                snippet: String::new(),
                confidence: HitConfidence::Low,
                retrieved_at: Utc::now(),
            })
            .collect();
        CorroborationResult::new(index, hits, vec![], vec![])
    }

    #[test]
    fn test_nothing_scores_zero() {
        let risk = score_risk(&[], &[]);
        assert_eq!(risk.score, 0);
        assert!(risk.reasons.is_empty());
        assert_eq!(risk.priority, Priority::Low);
    }

    #[test]
    fn test_all_factors_in_order_and_capped() {
        let claims = vec![
            with_excerpt(ClaimType::Pattern, "workers were harmed repeatedly"),
            with_excerpt(ClaimType::Fraud, "fraud worth $2 million"),
        ];
        let risk = score_risk(&claims, &[result(0, 0), result(1, 2)]);

        assert_eq!(risk.score, 100);
        assert_eq!(
            risk.reasons,
            vec![
                REASON_CRITICAL,
                REASON_MONETARY,
                REASON_CORROBORATED,
                REASON_PATTERN,
                REASON_SAFETY
            ]
        );
        assert_eq!(risk.priority, Priority::Critical);
    }

    #[test]
    fn test_partial_factors() {
        let claims = vec![with_excerpt(ClaimType::Denial, "benefits of $900 were denied")];
        let risk = score_risk(&claims, &[result(0, 1)]);
        assert_eq!(risk.score, MONETARY_POINTS);
        assert_eq!(risk.reasons, vec![REASON_MONETARY]);
        assert_eq!(risk.priority, Priority::Low);

        let claims = vec![with_excerpt(ClaimType::Abuse, "abuse")];
        let risk = score_risk(&claims, &[result(0, 3)]);
        assert_eq!(risk.score, CRITICAL_CLAIM_POINTS + STRONG_CORROBORATION_POINTS);
        assert_eq!(risk.priority, Priority::High);
    }

    #[test]
    fn test_deterministic() {
        let claims = vec![
            with_excerpt(ClaimType::Negligence, "failed to act on injury reports"),
            with_excerpt(ClaimType::Fraud, "fraud"),
        ];
        let corroboration = vec![result(0, 2), result(1, 0)];
        assert_eq!(score_risk(&claims, &corroboration), score_risk(&claims, &corroboration));
    }

    #[test]
    fn test_adding_claims_never_lowers_score() {
        let base = vec![with_excerpt(ClaimType::Denial, "denied $500")];
        let mut more = base.clone();
        more.push(with_excerpt(ClaimType::Violation, "illegal"));
        assert!(score_risk(&more, &[]).score >= score_risk(&base, &[]).score);
    }
}
