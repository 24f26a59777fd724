//! Evidence-strength rubric
//!
//! Additive points over four contextual signals. Every weight is non-negative, so
//! adding a signal can never lower a claim's bucket.

use crate::model::{EvidenceStrength, ExtractedEntities};
use crate::service::patterns;

pub const NAMED_ENTITY_POINTS: u32 = 30;
pub const AMOUNT_POINTS: u32 = 25;
pub const DATE_POINTS: u32 = 20;
pub const DEFINITIVE_LANGUAGE_POINTS: u32 = 25;

/// Signals observed in a claim's context window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvidenceSignals {
    pub named_entity: bool,
    pub amount: bool,
    pub date: bool,
    pub definitive_language: bool,
}

impl EvidenceSignals {
    pub fn detect(window: &str, entities: &ExtractedEntities) -> Self {
        let named_entity = entities
            .organizations
            .iter()
            .map(|o| o.name.as_str())
            .chain(entities.people.iter().map(|p| p.name.as_str()))
            .any(|name| window.contains(name));

        Self {
            named_entity,
            amount: patterns::MONEY.is_match(window),
            date: patterns::first_date_mention(window).is_some(),
            definitive_language: patterns::DEFINITIVE_LANGUAGE.is_match(window),
        }
    }

    pub fn points(&self) -> u32 {
        let mut points = 0;
        if self.named_entity {
            points += NAMED_ENTITY_POINTS;
        }
        if self.amount {
            points += AMOUNT_POINTS;
        }
        if self.date {
            points += DATE_POINTS;
        }
        if self.definitive_language {
            points += DEFINITIVE_LANGUAGE_POINTS;
        }
        points
    }

    pub fn strength(&self) -> EvidenceStrength {
        EvidenceStrength::from_points(self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::entities::extract_entities;

    #[test]
    fn test_entity_amount_date_is_high() {
        let text = "WSIB denied John Smith's claim for $50,000 in 2023";
        let signals = EvidenceSignals::detect(text, &extract_entities(text));

        assert!(signals.named_entity && signals.amount && signals.date);
        assert!(!signals.definitive_language);
        assert_eq!(signals.points(), 75);
        assert_eq!(signals.strength(), EvidenceStrength::High);
    }

    #[test]
    fn test_bare_allegation_is_low() {
        let text = "the claim was denied";
        let signals = EvidenceSignals::detect(text, &extract_entities(text));
        assert_eq!(signals.points(), 0);
        assert_eq!(signals.strength(), EvidenceStrength::Low);
    }

    #[test]
    fn test_adding_any_signal_never_lowers_strength() {
        for mask in 0u8..16 {
            let base = EvidenceSignals {
                named_entity: mask & 1 != 0,
                amount: mask & 2 != 0,
                date: mask & 4 != 0,
                definitive_language: mask & 8 != 0,
            };
            let upgrades = [
                EvidenceSignals { named_entity: true, ..base },
                EvidenceSignals { amount: true, ..base },
                EvidenceSignals { date: true, ..base },
                EvidenceSignals { definitive_language: true, ..base },
            ];
            for upgraded in upgrades {
                assert!(upgraded.strength() >= base.strength());
                assert!(upgraded.points() >= base.points());
            }
        }
    }
}
