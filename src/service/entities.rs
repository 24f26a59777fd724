//! Entity extraction
//!
//! Independent pattern scans for people, organizations, monetary amounts and dates.
//! Each list is deduplicated by exact canonical text, keeping the first occurrence.
//! Identity is never resolved across documents.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    DateEntity, ExtractedEntities, Mention, MoneyEntity, OrganizationCategory,
    OrganizationEntity, PersonEntity,
};
use crate::service::patterns;
use crate::service::text::{char_offset, context_window};

/// Characters of context recorded on each side of an entity mention
pub const ENTITY_CONTEXT_CHARS: usize = 100;

/// Titles recognized after a name ("Mary Jones, Director"); longer titles first
const ROLE_TITLES: &[&str] = &[
    "Deputy Minister", "Case Manager", "CEO", "President", "Director", "Minister",
    "Commissioner", "Manager", "Chair", "Adjudicator", "Ombudsman", "Spokesperson", "Officer",
    "Secretary", "Doctor", "Physician", "Lawyer", "Registrar", "Superintendent", "MPP", "MP",
];

static PERSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b([A-Z][a-z]+)\s+([A-Z][a-z]+)\b(?:,?\s+(?:the\s+)?({}))?\b",
        ROLE_TITLES.join("|")
    ))
    .expect("person pattern")
});

/// Capitalized words that start or end institutional phrases rather than names
const NON_NAME_WORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "His", "Her", "Their", "Our", "In", "On", "At", "By",
    "For", "From", "After", "Before", "When", "While", "Under", "Since", "And", "But", "If", "As",
    "Ministry", "Minister", "Board", "Tribunal", "Office", "Workplace", "Safety", "Insurance",
    "Ontario", "Canada", "Canadian", "Toronto", "Ottawa", "Government", "Federal", "Provincial",
    "City", "Council", "Department", "Commission", "Commissioner", "Auditor", "General",
    "Ombudsman", "Integrity", "Human", "Rights", "Disability", "Support", "Program", "Works",
    "Social", "Services", "Service", "Benefits", "Health", "Labour", "Appeals", "Agency",
    "Revenue", "Life", "Sun", "Great", "West", "Court", "Justice", "Supreme", "Legislative",
    "Assembly", "House", "Commons", "Freedom", "Information", "Access", "Privacy", "Act",
    "Charter", "Section", "Article", "North", "South", "East", "New", "Monday", "Tuesday",
    "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January", "February", "March",
    "April", "May", "June", "July", "August", "September", "October", "November", "December",
];

/// Known institution patterns, in precedence order
const ORGANIZATION_PATTERNS: &[(&str, OrganizationCategory)] = &[
    (
        r"\bWorkplace Safety and Insurance Appeals Tribunal\b|\bWSIAT\b",
        OrganizationCategory::WorkersComp,
    ),
    (
        r"\bWorkplace Safety and Insurance Board\b|\bWSIB\b",
        OrganizationCategory::WorkersComp,
    ),
    (r"\bWorkers'? Compensation Board\b|\bWCB\b", OrganizationCategory::WorkersComp),
    (
        r"\bOntario Disability Support Program\b|\bODSP\b",
        OrganizationCategory::Government,
    ),
    (r"\bOntario Works\b", OrganizationCategory::Government),
    (r"\bSocial Benefits Tribunal\b", OrganizationCategory::Government),
    (
        r"\bMinistry of(?:\s+(?:the\s+|and\s+)?[A-Z][a-z]+)+",
        OrganizationCategory::Government,
    ),
    (r"\bOmbudsman(?: Ontario)?\b", OrganizationCategory::Government),
    (r"\bAuditor General(?: of (?:Ontario|Canada))?\b", OrganizationCategory::Government),
    (r"\bIntegrity Commissioner\b", OrganizationCategory::Government),
    (r"\bGovernment of (?:Ontario|Canada)\b", OrganizationCategory::Government),
    (r"\bService Canada\b", OrganizationCategory::Government),
    (r"\bCanada Revenue Agency\b|\bCRA\b", OrganizationCategory::Government),
    (
        r"\b(?:Manulife|Sun Life|Canada Life|Great-West Life|Desjardins|Intact)(?: Financial| Insurance)?\b",
        OrganizationCategory::Insurance,
    ),
    (r"\b[A-Z][a-z]+ Insurance(?: Company)?\b", OrganizationCategory::Insurance),
];

static ORGANIZATIONS: Lazy<Vec<(Regex, OrganizationCategory)>> = Lazy::new(|| {
    ORGANIZATION_PATTERNS
        .iter()
        .map(|(pattern, category)| (Regex::new(pattern).expect("organization pattern"), *category))
        .collect()
});

/// Run all entity scans over `text`
pub fn extract_entities(text: &str) -> ExtractedEntities {
    let (organizations, org_spans) = extract_organizations(text);
    let (money, money_spans) = extract_money(text);
    let people = extract_people(text, &org_spans);
    let dates = extract_dates(text, &money_spans);

    tracing::debug!(
        people = people.len(),
        organizations = organizations.len(),
        money = money.len(),
        dates = dates.len(),
        "Extracted entities"
    );

    ExtractedEntities {
        people,
        organizations,
        money,
        dates,
    }
}

fn mention(text: &str, range: &Range<usize>) -> Mention {
    Mention {
        offset: char_offset(text, range.start),
        context: context_window(text, range.start, range.end, ENTITY_CONTEXT_CHARS),
    }
}

fn overlaps(range: &Range<usize>, spans: &[Range<usize>]) -> bool {
    spans
        .iter()
        .any(|span| range.start < span.end && span.start < range.end)
}

fn extract_organizations(text: &str) -> (Vec<OrganizationEntity>, Vec<Range<usize>>) {
    let mut found: Vec<(Range<usize>, String, OrganizationCategory)> = Vec::new();

    for (pattern, category) in ORGANIZATIONS.iter() {
        for m in pattern.find_iter(text) {
            let range = m.range();
            // Earlier table entries own overlapping text, e.g. WSIAT over "Insurance"
            if found
                .iter()
                .any(|(r, _, _)| range.start < r.end && r.start < range.end)
            {
                continue;
            }
            found.push((range, m.as_str().trim().to_string(), *category));
        }
    }

    found.sort_by_key(|(range, _, _)| range.start);
    let spans = found.iter().map(|(r, _, _)| r.clone()).collect();

    let mut seen = HashSet::new();
    let organizations = found
        .into_iter()
        .filter(|(_, name, _)| seen.insert(name.clone()))
        .map(|(range, name, category)| OrganizationEntity {
            mention: mention(text, &range),
            name,
            category,
        })
        .collect();

    (organizations, spans)
}

/// A capitalized word that cannot be part of a personal name, including leading titles
fn is_non_name(word: &str) -> bool {
    NON_NAME_WORDS.contains(&word) || ROLE_TITLES.contains(&word)
}

fn extract_people(text: &str, org_spans: &[Range<usize>]) -> Vec<PersonEntity> {
    let mut seen = HashSet::new();
    let mut people = Vec::new();
    let mut pos = 0;

    // Matches overlap on rejection: "After John Smith" is retried from "John"
    while let Some(caps) = PERSON.captures_at(text, pos) {
        let (Some(whole), Some(first), Some(last)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };
        let name_range = first.start()..last.end();

        if is_non_name(first.as_str())
            || is_non_name(last.as_str())
            || overlaps(&name_range, org_spans)
        {
            pos = last.start();
            continue;
        }
        pos = whole.end();

        let name = format!("{} {}", first.as_str(), last.as_str());
        if !seen.insert(name.clone()) {
            continue;
        }

        people.push(PersonEntity {
            name,
            role: caps.get(3).map(|m| m.as_str().to_string()),
            mention: mention(text, &name_range),
        });
    }

    people
}

fn extract_money(text: &str) -> (Vec<MoneyEntity>, Vec<Range<usize>>) {
    let mut seen = HashSet::new();
    let mut money = Vec::new();
    let mut spans = Vec::new();

    for caps in patterns::MONEY.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        spans.push(whole.range());

        let scale = caps.get(2).map(|m| m.as_str().to_lowercase());
        let amount = match &scale {
            Some(scale) => format!("{} {}", number.as_str(), scale),
            None => number.as_str().to_string(),
        };
        if !seen.insert(amount.clone()) {
            continue;
        }

        money.push(MoneyEntity {
            value: parse_amount(number.as_str(), scale.as_deref()),
            amount,
            mention: mention(text, &whole.range()),
        });
    }

    (money, spans)
}

fn parse_amount(number: &str, scale: Option<&str>) -> f64 {
    let base: f64 = number.replace(',', "").parse().unwrap_or(0.0);
    let multiplier = match scale {
        Some("thousand") => 1_000.0,
        Some("million") => 1_000_000.0,
        Some("billion") => 1_000_000_000.0,
        _ => 1.0,
    };
    base * multiplier
}

fn extract_dates(text: &str, money_spans: &[Range<usize>]) -> Vec<DateEntity> {
    let mut found: Vec<(Range<usize>, String)> = Vec::new();

    for pattern in patterns::full_date_patterns() {
        for m in pattern.find_iter(text) {
            found.push((m.range(), m.as_str().to_string()));
        }
    }

    // Bare years only count when not part of a fuller date or an amount
    let mut taken: Vec<Range<usize>> = found.iter().map(|(r, _)| r.clone()).collect();
    taken.extend(money_spans.iter().cloned());
    for m in patterns::YEAR.find_iter(text) {
        if !overlaps(&m.range(), &taken) {
            found.push((m.range(), m.as_str().to_string()));
        }
    }

    found.sort_by_key(|(range, _)| range.start);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|(_, date)| seen.insert(date.clone()))
        .map(|(range, date)| DateEntity {
            mention: mention(text, &range),
            text: date,
        })
        .collect()
}
