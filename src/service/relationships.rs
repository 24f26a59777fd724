//! Proximity-based relationship inference
//!
//! A person and an organization whose first mentions sit within 200 characters of
//! each other are linked by an "employment" edge. This is deliberately crude: it
//! encodes textual co-occurrence only, and downstream scoring assumes exactly this
//! behavior (including its false positives). Do not replace it with parsing.

use crate::model::{ExtractedEntities, Relationship, RelationshipConfidence, RelationshipType};

const HIGH_CONFIDENCE_DISTANCE: usize = 50;
const MAX_DISTANCE: usize = 200;

pub fn map_relationships(entities: &ExtractedEntities) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for person in &entities.people {
        for org in &entities.organizations {
            let distance = person.mention.offset.abs_diff(org.mention.offset);

            let confidence = if distance < HIGH_CONFIDENCE_DISTANCE {
                RelationshipConfidence::High
            } else if distance < MAX_DISTANCE {
                RelationshipConfidence::Medium
            } else {
                continue;
            };

            relationships.push(Relationship {
                from: person.name.clone(),
                to: org.name.clone(),
                relationship_type: RelationshipType::Employment,
                confidence,
                distance,
                evidence: person.mention.context.clone(),
            });
        }
    }

    relationships
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::entities::extract_entities;

    #[test]
    fn test_distance_buckets() {
        let far = "x".repeat(120);
        let very_far = "y".repeat(250);
        let text = format!("Jane Doe of WSIB spoke. {far} Ministry of Labour. {very_far} Ombudsman Ontario");
        let entities = extract_entities(&text);
        let relationships = map_relationships(&entities);

        assert_eq!(relationships.len(), 2);
        assert_eq!(relationships[0].to, "WSIB");
        assert_eq!(relationships[0].confidence, RelationshipConfidence::High);
        assert_eq!(relationships[1].to, "Ministry of Labour");
        assert_eq!(relationships[1].confidence, RelationshipConfidence::Medium);
        assert!(relationships.iter().all(|r| r.from == "Jane Doe"));
        assert!(relationships.iter().all(|r| r.relationship_type == RelationshipType::Employment));
    }

    #[test]
    fn test_co_occurrence_is_enough() {
        // Proximity alone links them, even though the sentence says nothing about employment
        let entities = extract_entities("John Smith sued WSIB.");
        let relationships = map_relationships(&entities);

        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].distance, 16);
    }

    #[test]
    fn test_no_people_no_edges() {
        let entities = extract_entities("WSIB and the Ministry of Labour disagreed.");
        assert!(map_relationships(&entities).is_empty());
    }
}
