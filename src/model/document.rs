//! Input documents and the metadata derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder used wherever a value could not be determined
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    News,
    Official,
    Foi,
    Report,
    Social,
    #[default]
    Unknown,
}

/// Caller-supplied values that take precedence over derived metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MetadataOverrides {
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub jurisdiction: Option<String>,
}

/// Pipeline input as submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentInput {
    #[serde(default)]
    pub text: String,
    pub source_url_or_id: String,
    /// ISO-8601 timestamp at which the document was fetched
    pub fetch_date: Option<String>,
    pub source_type: Option<SourceType>,
    pub metadata_overrides: Option<MetadataOverrides>,
}

/// Caller contract violations, detected before the pipeline starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    #[error("missing required field: fetch_date")]
    MissingFetchDate,

    #[error("fetch_date is not an ISO-8601 timestamp: {0}")]
    InvalidFetchDate(String),

    #[error("missing required field: source_url_or_id")]
    MissingSource,
}

/// A validated document; immutable once submitted to the pipeline
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Document {
    pub text: String,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub declared_type: SourceType,
    pub overrides: MetadataOverrides,
}

impl TryFrom<DocumentInput> for Document {
    type Error = InputError;

    fn try_from(input: DocumentInput) -> Result<Self, Self::Error> {
        let source = input.source_url_or_id.trim().to_string();
        if source.is_empty() {
            return Err(InputError::MissingSource);
        }

        let raw_date = input
            .fetch_date
            .filter(|d| !d.trim().is_empty())
            .ok_or(InputError::MissingFetchDate)?;

        let fetched_at = DateTime::parse_from_rfc3339(raw_date.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| InputError::InvalidFetchDate(raw_date.clone()))?;

        Ok(Self {
            text: input.text,
            source,
            fetched_at,
            declared_type: input.source_type.unwrap_or_default(),
            overrides: input.metadata_overrides.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentLevel {
    City,
    Province,
    Federal,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Jurisdiction {
    pub level: GovernmentLevel,
    pub name: String,
}

impl Jurisdiction {
    pub fn unknown() -> Self {
        Self {
            level: GovernmentLevel::Unknown,
            name: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    pub title: String,
    /// `YYYY-MM-DD` when normalizable, otherwise the matched text
    pub date: String,
    pub author: String,
    pub source_type: SourceType,
    pub jurisdiction: Jurisdiction,
}
