use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category of an organization mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationCategory {
    WorkersComp,
    Government,
    Insurance,
    Other,
}

/// Where an entity was first seen in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mention {
    /// Character offset of the first occurrence
    pub offset: usize,
    /// ±100 characters around the first occurrence
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonEntity {
    pub name: String,
    /// Role title following the name, if any
    pub role: Option<String>,
    #[serde(flatten)]
    pub mention: Mention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationEntity {
    pub name: String,
    pub category: OrganizationCategory,
    #[serde(flatten)]
    pub mention: Mention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MoneyEntity {
    /// Amount text without the currency symbol, e.g. `50,000` or `2.5 million`
    pub amount: String,
    pub value: f64,
    #[serde(flatten)]
    pub mention: Mention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateEntity {
    pub text: String,
    #[serde(flatten)]
    pub mention: Mention,
}

/// Entities of one document, each list deduplicated by canonical text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedEntities {
    pub people: Vec<PersonEntity>,
    pub organizations: Vec<OrganizationEntity>,
    pub money: Vec<MoneyEntity>,
    pub dates: Vec<DateEntity>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.organizations.is_empty()
            && self.money.is_empty()
            && self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.people.len() + self.organizations.len() + self.money.len() + self.dates.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Employment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipConfidence {
    High,
    Medium,
}

/// Directed edge suggested by textual proximity, not a verified fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub relationship_type: RelationshipType,
    pub confidence: RelationshipConfidence,
    /// Character distance between the first mentions
    pub distance: usize,
    pub evidence: String,
}
