//! Follow-up action generation
//!
//! FOI, oversight and media actions are drafted only for escalated documents (CRITICAL
//! or HIGH priority). The evidence checklist is always produced; weakly corroborated
//! claims are additionally flagged for investigation.

use std::collections::HashMap;

use crate::model::{
    Action, Claim, ClaimType, CorroborationResult, EvidenceChecklist, FoiRequest,
    InvestigationFlag, MediaAlert, OversightNotification, RiskAssessment, UNKNOWN,
};
use crate::service::patterns;
use crate::service::text::truncate_chars;

const MAX_FOI_EXCERPTS: usize = 3;
const MAX_STATEMENT_CHARS: usize = 280;
const DEFAULT_TIME_RANGE: &str = "past 5 years";

pub const WSIB_FOI_OFFICE: &str = "WSIB Freedom of Information Office";
pub const PROVINCIAL_FOI_OFFICE: &str = "Ontario Freedom of Information and Protection of Privacy Office";
pub const FEDERAL_ATIP_OFFICE: &str = "Access to Information and Privacy (ATIP) Office, Government of Canada";

pub const OMBUDSMAN: &str = "Ombudsman Ontario";
pub const INTEGRITY_COMMISSIONER: &str = "Integrity Commissioner of Ontario";
pub const AUDITOR_GENERAL: &str = "Auditor General of Ontario";

pub const ITEM_PRIMARY_SOURCES: &str = "Obtain primary sources for weakly corroborated claims";
pub const ITEM_FINANCIAL_RECORDS: &str = "Obtain financial records for the amounts cited";
pub const ITEM_LEGAL_REVIEW: &str = "Seek legal review of fraud and violation allegations";
pub const ITEM_WITNESSES: &str = "Collect witness testimonials";

/// Derive the ordered list of recommended actions
pub fn generate_actions(
    claims: &[Claim],
    corroboration: &[CorroborationResult],
    risk: &RiskAssessment,
) -> Vec<Action> {
    let mut actions = Vec::new();

    if risk.priority.is_escalated() && !claims.is_empty() {
        actions.push(Action::FileFoiRequest(draft_foi_request(claims)));
        actions.push(Action::NotifyOversightBody(oversight_notification(claims, risk)));
        actions.push(Action::PrepareMediaAlert(media_alert(&claims[0])));
    }

    let weak: Vec<&Claim> = corroboration
        .iter()
        .filter(|r| r.is_weak())
        .filter_map(|r| claims.get(r.claim_index))
        .collect();

    actions.push(Action::BuildEvidenceChecklist(evidence_checklist(claims, !weak.is_empty())));

    if !weak.is_empty() {
        actions.push(Action::FlagForFurtherInvestigation(InvestigationFlag {
            reason: "No authoritative source corroborates these claims".to_string(),
            claims: weak.iter().map(|c| c.excerpt.clone()).collect(),
        }));
    }

    tracing::debug!(
        priority = %risk.priority,
        actions = ?actions.iter().map(Action::kind).collect::<Vec<_>>(),
        "Actions generated"
    );

    actions
}

fn draft_foi_request(claims: &[Claim]) -> FoiRequest {
    let first_actor = claims
        .iter()
        .find(|c| c.has_known_actor())
        .map(|c| c.alleged_actor.as_str())
        .unwrap_or(UNKNOWN);

    let excerpts = claims
        .iter()
        .take(MAX_FOI_EXCERPTS)
        .map(|c| format!("- {}", c.excerpt))
        .collect::<Vec<_>>()
        .join("\n");

    let time_range = claim_time_range(claims);

    FoiRequest {
        target_office: foi_office(most_frequent_actor(claims)).to_string(),
        subject: format!("Records concerning {first_actor}"),
        body: format!(
            "Under the applicable freedom of information legislation, I request all records, \
             including correspondence, briefing notes and internal reports, held for the period \
             {time_range} relating to the following:\n{excerpts}"
        ),
        time_range,
    }
}

/// Earliest to latest event year, or the default window when no claim has a dated event
fn claim_time_range(claims: &[Claim]) -> String {
    let years: Vec<i32> = claims
        .iter()
        .filter_map(|c| patterns::year_of(&c.event_date))
        .collect();

    match (years.iter().min(), years.iter().max()) {
        (Some(min), Some(max)) if min == max => min.to_string(),
        (Some(min), Some(max)) => format!("{min}-{max}"),
        _ => DEFAULT_TIME_RANGE.to_string(),
    }
}

/// Most frequently alleged actor; ties go to the one named first
fn most_frequent_actor(claims: &[Claim]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for claim in claims.iter().filter(|c| c.has_known_actor()) {
        let count = counts.entry(claim.alleged_actor.as_str()).or_insert(0);
        if *count == 0 {
            order.push(claim.alleged_actor.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for actor in order {
        let count = counts[actor];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((actor, count));
        }
    }
    best.map(|(actor, _)| actor)
}

fn foi_office(actor: Option<&str>) -> &'static str {
    let actor = actor.unwrap_or_default();
    let lower = actor.to_lowercase();
    if lower.contains("wsib") || lower.contains("workplace safety and insurance") {
        WSIB_FOI_OFFICE
    } else if actor.contains("Ministry") {
        PROVINCIAL_FOI_OFFICE
    } else {
        FEDERAL_ATIP_OFFICE
    }
}

fn oversight_notification(claims: &[Claim], risk: &RiskAssessment) -> OversightNotification {
    let mut bodies = vec![OMBUDSMAN.to_string()];
    if claims.iter().any(|c| c.claim_type == ClaimType::Fraud) {
        bodies.push(INTEGRITY_COMMISSIONER.to_string());
    }
    bodies.push(AUDITOR_GENERAL.to_string());

    let mut types: Vec<ClaimType> = claims.iter().map(|c| c.claim_type).collect();
    types.sort();
    types.dedup();
    let types = types
        .iter()
        .map(ClaimType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    OversightNotification {
        bodies,
        summary: format!(
            "{} allegation(s) ({types}) assessed at risk score {} ({})",
            claims.len(),
            risk.score,
            risk.priority
        ),
    }
}

fn media_alert(claim: &Claim) -> MediaAlert {
    let statement = format!(
        "We are reviewing documents that allege {} involving {}: \"{}\"",
        claim.claim_type, claim.alleged_actor, claim.excerpt
    );

    let statement = if statement.chars().count() > MAX_STATEMENT_CHARS {
        let mut cut = truncate_chars(&statement, MAX_STATEMENT_CHARS - 1);
        cut.push('…');
        cut
    } else {
        statement
    };

    MediaAlert { statement }
}

fn evidence_checklist(claims: &[Claim], any_weak: bool) -> EvidenceChecklist {
    let mut items = Vec::new();
    if any_weak {
        items.push(ITEM_PRIMARY_SOURCES.to_string());
    }
    if claims.iter().any(|c| patterns::contains_currency(&c.excerpt)) {
        items.push(ITEM_FINANCIAL_RECORDS.to_string());
    }
    if claims
        .iter()
        .any(|c| matches!(c.claim_type, ClaimType::Violation | ClaimType::Fraud))
    {
        items.push(ITEM_LEGAL_REVIEW.to_string());
    }
    items.push(ITEM_WITNESSES.to_string());

    EvidenceChecklist { items }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{HitConfidence, Priority, SourceHit};
    use crate::sources::test_support::claim;

    fn dated(claim_type: ClaimType, actor: &str, excerpt: &str, date: &str) -> Claim {
        let mut c = claim(claim_type, "x", actor);
        c.excerpt = excerpt.to_string();
        c.event_date = date.to_string();
        c
    }

    fn corroborated(index: usize, hits: usize) -> CorroborationResult {
        let hits = (0..hits)
            .map(|i| SourceHit {
                source_id: format!("s{i}"),
                source_name: format!("Source {i}"),
                url: String::new(),
                snippet: String::new(),
                confidence: HitConfidence::High,
                retrieved_at: Utc::now(),
            })
            .collect();
        CorroborationResult::new(index, hits, vec![], vec![])
    }

    fn risk(score: u32) -> RiskAssessment {
        RiskAssessment {
            score,
            reasons: vec![],
            priority: Priority::from_score(score),
        }
    }

    fn kinds(actions: &[Action]) -> Vec<&'static str> {
        actions.iter().map(Action::kind).collect()
    }

    #[test]
    fn test_escalated_document_gets_full_action_set() {
        let claims = vec![
            dated(ClaimType::Fraud, "WSIB", "WSIB fraud of $3 million", "2019"),
            dated(ClaimType::Denial, "WSIB", "WSIB denied claims", "March 3, 2022"),
            dated(ClaimType::Abuse, "Ministry of Labour", "abuse", UNKNOWN),
            dated(ClaimType::Pattern, "WSIB", "systemic", UNKNOWN),
        ];
        let corroboration = vec![
            corroborated(0, 2),
            corroborated(1, 1),
            corroborated(2, 0),
            corroborated(3, 1),
        ];
        let actions = generate_actions(&claims, &corroboration, &risk(80));

        assert_eq!(
            kinds(&actions),
            vec![
                "file_foi_request",
                "notify_oversight_body",
                "prepare_media_alert",
                "build_evidence_checklist",
                "flag_for_further_investigation"
            ]
        );

        let Action::FileFoiRequest(foi) = &actions[0] else { panic!("expected FOI") };
        assert_eq!(foi.target_office, WSIB_FOI_OFFICE);
        assert_eq!(foi.subject, "Records concerning WSIB");
        assert_eq!(foi.time_range, "2019-2022");
        assert_eq!(foi.body.matches("\n- ").count(), 3);

        let Action::NotifyOversightBody(notice) = &actions[1] else { panic!("expected oversight") };
        assert_eq!(notice.bodies, vec![OMBUDSMAN, INTEGRITY_COMMISSIONER, AUDITOR_GENERAL]);

        let Action::BuildEvidenceChecklist(checklist) = &actions[3] else { panic!("expected checklist") };
        assert_eq!(
            checklist.items,
            vec![ITEM_PRIMARY_SOURCES, ITEM_FINANCIAL_RECORDS, ITEM_LEGAL_REVIEW, ITEM_WITNESSES]
        );

        let Action::FlagForFurtherInvestigation(flag) = &actions[4] else { panic!("expected flag") };
        assert_eq!(flag.claims, vec!["abuse".to_string()]);
    }

    #[test]
    fn test_weak_claim_flagged_but_not_escalated_at_low_priority() {
        let claims = vec![dated(ClaimType::Denial, UNKNOWN, "claim denied", UNKNOWN)];
        let actions = generate_actions(&claims, &[corroborated(0, 0)], &risk(0));

        assert_eq!(
            kinds(&actions),
            vec!["build_evidence_checklist", "flag_for_further_investigation"]
        );
        let Action::FlagForFurtherInvestigation(flag) = &actions[1] else { panic!("expected flag") };
        assert_eq!(flag.claims, vec!["claim denied".to_string()]);
    }

    #[test]
    fn test_checklist_always_present() {
        let actions = generate_actions(&[], &[], &risk(0));
        assert_eq!(
            actions,
            vec![Action::BuildEvidenceChecklist(EvidenceChecklist {
                items: vec![ITEM_WITNESSES.to_string()]
            })]
        );
    }

    #[test]
    fn test_foi_office_and_time_range_defaults() {
        assert_eq!(foi_office(Some("Ministry of Health")), PROVINCIAL_FOI_OFFICE);
        assert_eq!(foi_office(Some("Service Canada")), FEDERAL_ATIP_OFFICE);
        assert_eq!(foi_office(None), FEDERAL_ATIP_OFFICE);

        let undated = vec![dated(ClaimType::Fraud, UNKNOWN, "fraud", UNKNOWN)];
        assert_eq!(claim_time_range(&undated), DEFAULT_TIME_RANGE);
        assert_eq!(draft_foi_request(&undated).subject, "Records concerning unknown");
    }

    #[test]
    fn test_most_frequent_actor_tie_goes_to_first() {
        let claims = vec![
            dated(ClaimType::Denial, "Ministry of Labour", "", UNKNOWN),
            dated(ClaimType::Denial, "WSIB", "", UNKNOWN),
        ];
        assert_eq!(most_frequent_actor(&claims), Some("Ministry of Labour"));
    }

    #[test]
    fn test_media_statement_bounded() {
        let long = dated(ClaimType::Abuse, "WSIB", &"x".repeat(500), UNKNOWN);
        let alert = media_alert(&long);
        assert_eq!(alert.statement.chars().count(), MAX_STATEMENT_CHARS);
        assert!(alert.statement.ends_with('…'));
    }
}
