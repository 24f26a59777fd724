//! Claim extraction
//!
//! Scans text against the claim rule table. Every match is a separate claim: the same
//! allegation phrased twice at different offsets yields two sightings.

use crate::model::{Claim, ExtractedEntities, UNKNOWN};
use crate::service::patterns;
use crate::service::text::{char_offset, normalize_whitespace, window_bounds};

pub mod rules;
pub mod strength;

pub use rules::{ClaimRule, ClaimRuleSet};
pub use strength::EvidenceSignals;

/// Characters of context on each side of a trigger phrase
pub const CLAIM_CONTEXT_CHARS: usize = 200;

/// Extract every claim sighting from `text`, ordered by offset
pub fn extract_claims(text: &str, entities: &ExtractedEntities, rules: &ClaimRuleSet) -> Vec<Claim> {
    // (byte start, byte end, rule index) so equal offsets resolve in table order
    let mut matches: Vec<(usize, usize, usize)> = rules
        .rules()
        .iter()
        .enumerate()
        .flat_map(|(idx, rule)| {
            rule.pattern
                .find_iter(text)
                .map(move |m| (m.start(), m.end(), idx))
        })
        .collect();
    matches.sort_unstable();

    matches
        .into_iter()
        .map(|(start, end, idx)| {
            let (from, to) = window_bounds(text, start, end, CLAIM_CONTEXT_CHARS);
            let window = &text[from..to];
            let trigger_at = start - from;

            let signals = EvidenceSignals::detect(window, entities);
            let evidence_points = signals.points();

            Claim {
                claim_type: rules.rules()[idx].claim_type,
                trigger: text[start..end].to_string(),
                offset: char_offset(text, start),
                excerpt: normalize_whitespace(window),
                alleged_actor: nearest_actor(window, trigger_at, entities)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                alleged_victim: nearest_victim(window, trigger_at, rules)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                event_date: patterns::first_date_mention(window)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                evidence_points,
                evidence_strength: signals.strength(),
            }
        })
        .collect()
}

/// Nearest organization in the window, or the nearest person when no organization is present
fn nearest_actor(window: &str, trigger_at: usize, entities: &ExtractedEntities) -> Option<String> {
    let orgs = entities.organizations.iter().map(|o| o.name.as_str());
    let people = entities.people.iter().map(|p| p.name.as_str());

    nearest_name(window, trigger_at, orgs).or_else(|| nearest_name(window, trigger_at, people))
}

fn nearest_name<'a>(
    window: &str,
    trigger_at: usize,
    names: impl Iterator<Item = &'a str>,
) -> Option<String> {
    let trigger_char = char_offset(window, trigger_at);
    let mut best: Option<(usize, &str)> = None;

    for name in names {
        for (pos, _) in window.match_indices(name) {
            let distance = char_offset(window, pos).abs_diff(trigger_char);
            // strict comparison keeps the first candidate on ties
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, name));
            }
        }
    }

    best.map(|(_, name)| name.to_string())
}

fn nearest_victim(window: &str, trigger_at: usize, rules: &ClaimRuleSet) -> Option<String> {
    let trigger_char = char_offset(window, trigger_at);
    let mut best: Option<(usize, String)> = None;

    for caps in rules.victim_pattern().captures_iter(window) {
        let Some(role) = caps.get(1) else { continue };
        let distance = char_offset(window, role.start()).abs_diff(trigger_char);
        if best.as_ref().is_none_or(|(d, _)| distance < *d) {
            best = Some((distance, role.as_str().to_lowercase()));
        }
    }

    best.map(|(_, role)| role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClaimType, EvidenceStrength};
    use crate::service::entities::extract_entities;

    fn claims_for(text: &str) -> Vec<Claim> {
        extract_claims(text, &extract_entities(text), &ClaimRuleSet::default())
    }

    #[test]
    fn test_wsib_denial_scenario() {
        let claims = claims_for("WSIB denied John Smith's claim for $50,000 in 2023");

        assert_eq!(claims.len(), 1);
        let claim = &claims[0];
        assert_eq!(claim.claim_type, ClaimType::Denial);
        assert_eq!(claim.trigger, "denied");
        assert_eq!(claim.offset, 5);
        assert_eq!(claim.alleged_actor, "WSIB");
        assert_eq!(claim.alleged_victim, UNKNOWN);
        assert_eq!(claim.event_date, "2023");
        assert_eq!(claim.evidence_strength, EvidenceStrength::High);
    }

    #[test]
    fn test_repeated_phrases_are_separate_sightings() {
        let claims = claims_for("The board denied the worker. Months later it denied her again.");
        assert_eq!(claims.len(), 2);
        assert!(claims.iter().all(|c| c.claim_type == ClaimType::Denial));
        assert!(claims[0].offset < claims[1].offset);
        assert_eq!(claims[0].alleged_victim, "worker");
    }

    #[test]
    fn test_claims_ordered_by_offset_across_types() {
        let claims = claims_for("Allegations of fraud surfaced after the claimant was refused benefits.");
        let types: Vec<_> = claims.iter().map(|c| c.claim_type).collect();
        assert_eq!(types, vec![ClaimType::Fraud, ClaimType::Denial]);
        assert_eq!(claims[1].alleged_victim, "claimant");
    }

    #[test]
    fn test_organization_beats_closer_person() {
        let text = "Jane Doe said the request was rejected by the Ministry of Labour last spring.";
        let claims = claims_for(text);
        assert_eq!(claims[0].alleged_actor, "Ministry of Labour");
    }

    #[test]
    fn test_person_used_when_no_organization() {
        let claims = claims_for("Jane Doe repeatedly ignored complaints from patients.");
        assert_eq!(claims[0].claim_type, ClaimType::Pattern);
        assert_eq!(claims[0].alleged_actor, "Jane Doe");
        assert_eq!(claims[0].alleged_victim, "patient");
    }

    #[test]
    fn test_nothing_nearby_is_unknown() {
        let claims = claims_for("it was illegal");
        assert_eq!(claims[0].claim_type, ClaimType::Violation);
        assert_eq!(claims[0].alleged_actor, UNKNOWN);
        assert_eq!(claims[0].alleged_victim, UNKNOWN);
        assert_eq!(claims[0].event_date, UNKNOWN);
        assert_eq!(claims[0].evidence_strength, EvidenceStrength::Low);
    }

    #[test]
    fn test_actor_outside_window_is_ignored() {
        let gap = "z ".repeat(150);
        let text = format!("WSIB issued a statement. {gap} Later the file was refused.");
        let claims = claims_for(&text);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].alleged_actor, UNKNOWN);
    }

    #[test]
    fn test_empty_text_has_no_claims() {
        assert!(claims_for("").is_empty());
    }
}
