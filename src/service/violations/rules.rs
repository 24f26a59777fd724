//! Rights-impact rule tables
//!
//! Three independent tables: violation rules (keywords plus an optional co-occurrence
//! requirement, each carrying its citation), compliance rules (keyword pairs that move
//! one compliance dimension to POTENTIAL_VIOLATION) and population rules. Keywords match
//! case-insensitively as whole words with regular inflections: "reduce" matches
//! "reduced" and "deny" matches "denies", but "care" does not match "career".

use regex::Regex;

use crate::model::{Population, ViolationType};

pub struct ViolationRule {
    pub violation_type: ViolationType,
    pub keywords: &'static [&'static str],
    /// At least one of these must also appear; empty means no requirement
    pub requires: &'static [&'static str],
    pub charter: &'static str,
    pub treaty: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceDimension {
    Charter,
    HumanRights,
    Treaty,
}

pub struct ComplianceRule {
    pub dimension: ComplianceDimension,
    pub first: &'static [&'static str],
    pub second: &'static [&'static str],
}

pub struct PopulationRule {
    pub population: Population,
    pub keywords: &'static [&'static str],
}

const SECTION_7: &str = "Charter s. 7 (life, liberty and security of the person)";
const SECTION_15: &str = "Charter s. 15 (equality rights)";

pub const DEFAULT_VIOLATION_RULES: &[ViolationRule] = &[
    ViolationRule {
        violation_type: ViolationType::BenefitReductions,
        keywords: &["reduce", "reduction", "cut", "claw back", "clawback", "decrease", "eliminate", "freeze"],
        requires: &["benefit", "income support", "assistance", "pension", "allowance", "compensation"],
        charter: SECTION_7,
        treaty: "ICESCR Article 9 (social security)",
    },
    ViolationRule {
        violation_type: ViolationType::Deeming,
        keywords: &["deeming", "deemed", "phantom job", "notional earnings", "suitable and available employment"],
        requires: &[],
        charter: SECTION_7,
        treaty: "ICESCR Article 9 (social security)",
    },
    ViolationRule {
        violation_type: ViolationType::AppealsBarriers,
        keywords: &["appeal", "reconsideration", "tribunal", "hearing"],
        requires: &["delay", "backlog", "deadline", "time limit", "restrict", "barrier", "eliminate", "wait"],
        charter: "Charter s. 7 (procedural fairness)",
        treaty: "ICCPR Article 14 (fair hearing)",
    },
    ViolationRule {
        violation_type: ViolationType::MedicalDenial,
        keywords: &["medical", "treatment", "health care", "healthcare", "medication", "physiotherapy", "surgery"],
        requires: &["deny", "denied", "denial", "refuse", "restrict", "cut", "delay"],
        charter: SECTION_7,
        treaty: "ICESCR Article 12 (highest attainable standard of health)",
    },
    ViolationRule {
        violation_type: ViolationType::IncomeInadequacy,
        keywords: &["poverty", "inadequate", "insufficient", "not indexed", "frozen rates", "food bank", "homeless"],
        requires: &[],
        charter: SECTION_7,
        treaty: "ICESCR Article 11 (adequate standard of living)",
    },
    ViolationRule {
        violation_type: ViolationType::DiscriminatoryRules,
        keywords: &["discrimination", "discriminatory", "barrier", "exclude", "exclusion", "ineligible"],
        requires: &["disability", "disabled", "indigenous", "racialized", "newcomer", "senior", "gender"],
        charter: SECTION_15,
        treaty: "CRPD Article 5 (equality and non-discrimination)",
    },
];

pub const DEFAULT_COMPLIANCE_RULES: &[ComplianceRule] = &[
    // security of the person
    ComplianceRule {
        dimension: ComplianceDimension::Charter,
        first: &["deny", "denied", "denial", "reduce", "reduction", "cut", "eliminate", "terminate"],
        second: &["benefit", "income", "care", "treatment", "support"],
    },
    // equality rights
    ComplianceRule {
        dimension: ComplianceDimension::Charter,
        first: &["disability", "disabled"],
        second: &["discrimination", "discriminatory", "barrier", "exclude", "exclusion"],
    },
    ComplianceRule {
        dimension: ComplianceDimension::HumanRights,
        first: &["disability", "disabled", "family status", "racialized", "gender", "age-based"],
        second: &["discrimination", "discriminatory", "barrier", "accommodation", "ineligible", "exclude"],
    },
    ComplianceRule {
        dimension: ComplianceDimension::Treaty,
        first: &["poverty", "inadequate", "homeless", "food insecurity"],
        second: &["income", "benefit", "assistance", "housing"],
    },
];

pub const DEFAULT_POPULATION_RULES: &[PopulationRule] = &[
    PopulationRule {
        population: Population::PeopleWithDisabilities,
        keywords: &["disability", "disabled", "odsp", "accessibility"],
    },
    PopulationRule {
        population: Population::InjuredWorkers,
        keywords: &["injured worker", "workplace injury", "wsib", "workers' compensation", "workers compensation"],
    },
    PopulationRule {
        population: Population::SocialAssistanceRecipients,
        keywords: &["ontario works", "social assistance", "welfare", "odsp"],
    },
    PopulationRule {
        population: Population::Seniors,
        keywords: &["senior", "elderly", "older adult", "pension"],
    },
    PopulationRule {
        population: Population::IndigenousPeoples,
        keywords: &["indigenous", "first nation", "métis", "inuit"],
    },
    PopulationRule {
        population: Population::Newcomers,
        keywords: &["newcomer", "immigrant", "refugee", "migrant"],
    },
    PopulationRule {
        population: Population::LowIncomeHouseholds,
        keywords: &["low-income", "low income", "poverty", "food bank"],
    },
    PopulationRule {
        population: Population::ChildrenAndFamilies,
        keywords: &["child", "children", "family", "youth", "parent"],
    },
];

/// Regular English endings accepted after a keyword
const ENDINGS: &str = "|s|es|ed|ing|er|ers|ion|ions|ness";
/// Endings for keywords ending in a silent "e" (reduce, exclude)
const E_ENDINGS: &str = "e|es|ed|ing|er|ers|ion|ions";
/// Endings for keywords ending in consonant + "y" (deny, disability)
const Y_ENDINGS: &str = "y|ies|ied|ying";

fn keyword_pattern(keyword: &str) -> String {
    let mut chars = keyword.chars().rev();
    let last = chars.next();
    let before_last = chars.next();
    let is_vowel = |c: char| "aeiou".contains(c);

    let (stem, endings) = match (last, before_last) {
        (Some('e'), Some(_)) => (&keyword[..keyword.len() - 1], E_ENDINGS),
        (Some('y'), Some(c)) if !is_vowel(c) => (&keyword[..keyword.len() - 1], Y_ENDINGS),
        _ => (keyword, ENDINGS),
    };

    let stem = regex::escape(stem).replace(' ', r"\s+");
    format!(r"(?i)\b{stem}(?:{endings})\b")
}

/// Keywords compiled to case-insensitive whole-word patterns
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<(String, Regex)>,
}

impl KeywordSet {
    pub fn new(keywords: &[&str]) -> Result<Self, regex::Error> {
        let keywords = keywords
            .iter()
            .map(|k| Ok((k.to_string(), Regex::new(&keyword_pattern(k))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { keywords })
    }

    /// Distinct keywords present in `text`, in table order
    pub fn matches<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.keywords
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(keyword, _)| keyword.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompiledViolationRule {
    pub violation_type: ViolationType,
    pub keywords: KeywordSet,
    pub requires: KeywordSet,
    pub charter: String,
    pub treaty: String,
}

#[derive(Debug, Clone)]
pub struct CompiledComplianceRule {
    pub dimension: ComplianceDimension,
    pub first: KeywordSet,
    pub second: KeywordSet,
}

#[derive(Debug, Clone)]
pub struct CompiledPopulationRule {
    pub population: Population,
    pub keywords: KeywordSet,
}

/// Compiled, swappable rights-impact tables
#[derive(Debug, Clone)]
pub struct ViolationRuleSet {
    pub violations: Vec<CompiledViolationRule>,
    pub compliance: Vec<CompiledComplianceRule>,
    pub populations: Vec<CompiledPopulationRule>,
}

impl ViolationRuleSet {
    pub fn new(
        violations: &[ViolationRule],
        compliance: &[ComplianceRule],
        populations: &[PopulationRule],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            violations: violations
                .iter()
                .map(|r| {
                    Ok(CompiledViolationRule {
                        violation_type: r.violation_type,
                        keywords: KeywordSet::new(r.keywords)?,
                        requires: KeywordSet::new(r.requires)?,
                        charter: r.charter.to_string(),
                        treaty: r.treaty.to_string(),
                    })
                })
                .collect::<Result<_, regex::Error>>()?,
            compliance: compliance
                .iter()
                .map(|r| {
                    Ok(CompiledComplianceRule {
                        dimension: r.dimension,
                        first: KeywordSet::new(r.first)?,
                        second: KeywordSet::new(r.second)?,
                    })
                })
                .collect::<Result<_, regex::Error>>()?,
            populations: populations
                .iter()
                .map(|r| {
                    Ok(CompiledPopulationRule {
                        population: r.population,
                        keywords: KeywordSet::new(r.keywords)?,
                    })
                })
                .collect::<Result<_, regex::Error>>()?,
        })
    }
}

impl Default for ViolationRuleSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_VIOLATION_RULES,
            DEFAULT_COMPLIANCE_RULES,
            DEFAULT_POPULATION_RULES,
        )
        .expect("built-in violation rules compile")
    }
}
