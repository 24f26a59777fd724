//! Rights-impact classifier for dataset, bill and policy descriptions
//!
//! Runs independently of the document pipeline but follows the same shape: scan the
//! text against rule tables, bucket the match count into a severity and attach the
//! citation that explains the flag.

use crate::model::{
    Citation, ComplianceStatus, PolicyItem, Severity, ViolationAssessment, ViolationFlag,
    ViolationSummary,
};

pub mod rules;

pub use rules::{ComplianceDimension, ViolationRuleSet};

/// Classify one policy item
pub fn classify(item: &PolicyItem, rules: &ViolationRuleSet) -> ViolationAssessment {
    let text = format!("{}\n{}", item.title, item.description);

    let violations: Vec<ViolationFlag> = rules
        .violations
        .iter()
        .filter_map(|rule| {
            let keywords = rule.keywords.matches(&text);
            if keywords.is_empty() {
                return None;
            }
            let context = rule.requires.matches(&text);
            if !rule.requires.is_empty() && context.is_empty() {
                return None;
            }

            let matched_keywords: Vec<String> = keywords
                .into_iter()
                .chain(context)
                .map(str::to_string)
                .collect();

            Some(ViolationFlag {
                violation_type: rule.violation_type,
                severity: Severity::from_match_count(matched_keywords.len()),
                matched_keywords,
                citation: Citation {
                    charter: rule.charter.clone(),
                    treaty: rule.treaty.clone(),
                },
            })
        })
        .collect();

    let fired = |dimension: ComplianceDimension| {
        rules.compliance.iter().any(|rule| {
            rule.dimension == dimension
                && !rule.first.matches(&text).is_empty()
                && !rule.second.matches(&text).is_empty()
        })
    };

    let charter_status = if fired(ComplianceDimension::Charter) {
        ComplianceStatus::PotentialViolation
    } else {
        ComplianceStatus::RequiresReview
    };
    let human_rights_status = if fired(ComplianceDimension::HumanRights) {
        ComplianceStatus::PotentialViolation
    } else {
        ComplianceStatus::RequiresReview
    };
    let treaty_status = if fired(ComplianceDimension::Treaty) {
        ComplianceStatus::PotentialViolation
    } else if !violations.is_empty() {
        ComplianceStatus::RequiresReview
    } else {
        ComplianceStatus::RequiresAssessment
    };

    let impacted_populations = rules
        .populations
        .iter()
        .filter(|rule| !rule.keywords.matches(&text).is_empty())
        .map(|rule| rule.population)
        .collect();

    tracing::debug!(
        title = %item.title,
        violations = violations.len(),
        charter = ?charter_status,
        "Classified policy item"
    );

    ViolationAssessment {
        violations,
        charter_status,
        human_rights_status,
        treaty_status,
        impacted_populations,
    }
}

/// Aggregate counts for a periodic report
pub fn summarize(assessments: &[ViolationAssessment]) -> ViolationSummary {
    let mut summary = ViolationSummary {
        items_analyzed: assessments.len(),
        ..Default::default()
    };

    for assessment in assessments {
        if !assessment.violations.is_empty() {
            summary.items_flagged += 1;
        }
        for flag in &assessment.violations {
            *summary.by_type.entry(flag.violation_type).or_default() += 1;
            *summary.by_severity.entry(flag.severity).or_default() += 1;
        }
        for population in &assessment.impacted_populations {
            *summary.by_population.entry(*population).or_default() += 1;
        }
        if assessment.charter_status == ComplianceStatus::PotentialViolation {
            summary.potential_charter_violations += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Population, ViolationType};

    fn item(title: &str, description: &str) -> PolicyItem {
        PolicyItem {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn classify_default(title: &str, description: &str) -> ViolationAssessment {
        classify(&item(title, description), &ViolationRuleSet::default())
    }

    #[test]
    fn test_reduce_income_support_is_section_7() {
        let assessment = classify_default("Bill 42", "Will reduce income support for recipients");

        assert_eq!(assessment.violations.len(), 1);
        let flag = &assessment.violations[0];
        assert_eq!(flag.violation_type, ViolationType::BenefitReductions);
        assert!(flag.citation.charter.starts_with("Charter s. 7"));
        assert_eq!(flag.matched_keywords, vec!["reduce", "income support"]);
        assert_eq!(flag.severity, Severity::High);
        assert_eq!(assessment.charter_status, ComplianceStatus::PotentialViolation);
        assert_eq!(assessment.treaty_status, ComplianceStatus::RequiresReview);
    }

    #[test]
    fn test_three_matches_is_critical() {
        let assessment = classify_default(
            "Benefit changes",
            "The plan will reduce and freeze income support payments",
        );
        let flag = &assessment.violations[0];
        assert_eq!(flag.violation_type, ViolationType::BenefitReductions);
        assert!(flag.matched_keywords.len() >= 3);
        assert_eq!(flag.severity, Severity::Critical);
    }

    #[test]
    fn test_keyword_without_context_does_not_flag() {
        let assessment = classify_default("Costs", "We will reduce paperwork");
        assert!(assessment.violations.is_empty());
        assert_eq!(assessment.charter_status, ComplianceStatus::RequiresReview);
        assert_eq!(assessment.human_rights_status, ComplianceStatus::RequiresReview);
        assert_eq!(assessment.treaty_status, ComplianceStatus::RequiresAssessment);
    }

    #[test]
    fn test_single_keyword_rule_is_medium() {
        let assessment = classify_default("WSIB deeming policy", "");
        assert_eq!(assessment.violations[0].violation_type, ViolationType::Deeming);
        assert_eq!(assessment.violations[0].severity, Severity::Medium);
        assert_eq!(assessment.impacted_populations, vec![Population::InjuredWorkers]);
    }

    #[test]
    fn test_disability_discrimination_is_equality_flag() {
        let assessment = classify_default(
            "ODSP eligibility rules",
            "New barrier for people with a disability",
        );
        let types: Vec<_> = assessment.violations.iter().map(|v| v.violation_type).collect();
        assert!(types.contains(&ViolationType::DiscriminatoryRules));
        assert_eq!(assessment.charter_status, ComplianceStatus::PotentialViolation);
        assert_eq!(assessment.human_rights_status, ComplianceStatus::PotentialViolation);
        assert!(assessment
            .impacted_populations
            .contains(&Population::PeopleWithDisabilities));
        assert!(assessment
            .impacted_populations
            .contains(&Population::SocialAssistanceRecipients));
    }

    #[test]
    fn test_summary_counts() {
        let assessments = vec![
            classify_default("Bill 42", "Will reduce income support"),
            classify_default("WSIB deeming policy", ""),
            classify_default("Parks dataset", "Trail locations"),
        ];
        let summary = summarize(&assessments);

        assert_eq!(summary.items_analyzed, 3);
        assert_eq!(summary.items_flagged, 2);
        assert_eq!(summary.by_type[&ViolationType::BenefitReductions], 1);
        assert_eq!(summary.by_type[&ViolationType::Deeming], 1);
        assert_eq!(summary.by_severity[&Severity::High], 1);
        assert_eq!(summary.by_severity[&Severity::Medium], 1);
        assert_eq!(summary.potential_charter_violations, 1);
    }
}
