//! Document analysis service
//!
//! Runs the pipeline: metadata, entities, relationships, claims, corroboration, risk,
//! actions, provenance. Only corroboration suspends. The whole run sits under one
//! deadline; when it expires everything computed so far is dropped and no report is
//! produced.

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::try_join_all;
use tokio::time::timeout;

use crate::model::{
    AnalysisReport, Document, DocumentInput, InputError, PolicyItem, ViolationAssessment,
    ViolationSummary,
};
use crate::service::actions::generate_actions;
use crate::service::cache_keys::content_hash;
use crate::service::claims::{ClaimRuleSet, extract_claims};
use crate::service::corroboration::CorroborationEngine;
use crate::service::entities::extract_entities;
use crate::service::metadata::extract_metadata;
use crate::service::provenance::compile_provenance;
use crate::service::relationships::map_relationships;
use crate::service::risk::score_risk;
use crate::service::violations::{self, ViolationRuleSet};

const REPORT_ID_HASH_CHARS: usize = 16;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Invalid input in document {index}: {error}")]
    InvalidBatchItem {
        index: usize,
        #[source]
        error: InputError,
    },

    #[error("Analysis exceeded its deadline of {}s", .0.as_secs())]
    DeadlineExceeded(Duration),
}

pub struct AnalysisService {
    corroboration: CorroborationEngine,
    claim_rules: ClaimRuleSet,
    violation_rules: ViolationRuleSet,
    deadline: Duration,
}

impl AnalysisService {
    pub fn new(
        corroboration: CorroborationEngine,
        claim_rules: ClaimRuleSet,
        violation_rules: ViolationRuleSet,
        deadline: Duration,
    ) -> Self {
        tracing::info!(
            deadline_secs = deadline.as_secs(),
            backend = corroboration.backend(),
            "Analysis service initialized"
        );
        Self {
            corroboration,
            claim_rules,
            violation_rules,
            deadline,
        }
    }

    pub fn corroboration(&self) -> &CorroborationEngine {
        &self.corroboration
    }

    /// Validate and analyse one document
    pub async fn analyze(&self, input: DocumentInput) -> Result<AnalysisReport, AnalysisError> {
        let document = Document::try_from(input)?;
        self.analyze_document(&document).await
    }

    /// Analyse several documents concurrently
    ///
    /// Every input is validated before any pipeline starts. Reports come back in input order.
    pub async fn analyze_batch(
        &self,
        inputs: Vec<DocumentInput>,
    ) -> Result<Vec<AnalysisReport>, AnalysisError> {
        let documents = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                Document::try_from(input).map_err(|error| AnalysisError::InvalidBatchItem { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;

        try_join_all(documents.iter().map(|doc| self.analyze_document(doc))).await
    }

    pub async fn analyze_document(&self, document: &Document) -> Result<AnalysisReport, AnalysisError> {
        timeout(self.deadline, self.run_pipeline(document))
            .await
            .map_err(|_| {
                tracing::warn!(
                    source = %document.source,
                    deadline_secs = self.deadline.as_secs(),
                    "Analysis deadline exceeded, discarding partial results"
                );
                AnalysisError::DeadlineExceeded(self.deadline)
            })
    }

    async fn run_pipeline(&self, document: &Document) -> AnalysisReport {
        let started = Instant::now();

        let metadata = extract_metadata(document);
        let entities = extract_entities(&document.text);
        let relationships = map_relationships(&entities);
        let claims = extract_claims(&document.text, &entities, &self.claim_rules);

        let corroboration = self.corroboration.corroborate(&claims).await;

        let risk = score_risk(&claims, &corroboration);
        let suggested_actions = generate_actions(&claims, &corroboration, &risk);
        let provenance = compile_provenance(document, &corroboration);

        let processed_at = Utc::now();
        let hash = content_hash(&document.source, &document.text);
        let id = format!(
            "{}-{}",
            &hash[..REPORT_ID_HASH_CHARS],
            processed_at.timestamp_millis()
        );
        let processing_time_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            doc_id = %id,
            source = %document.source,
            entities = entities.len(),
            claims = claims.len(),
            risk_score = risk.score,
            priority = %risk.priority,
            elapsed_ms = processing_time_ms,
            "Document analysed"
        );

        AnalysisReport {
            id,
            metadata,
            entities,
            relationships,
            claims,
            corroboration,
            risk_score: risk.score,
            risk_explanation: risk.reasons,
            priority: risk.priority,
            suggested_actions,
            provenance,
            processing_time_ms,
            processed_at,
        }
    }

    pub fn classify_policy(&self, item: &PolicyItem) -> ViolationAssessment {
        violations::classify(item, &self.violation_rules)
    }

    /// Per-item assessments plus the aggregate used by periodic reports
    pub fn violation_report(&self, items: &[PolicyItem]) -> (Vec<ViolationAssessment>, ViolationSummary) {
        let assessments: Vec<_> = items.iter().map(|item| self.classify_policy(item)).collect();
        let summary = violations::summarize(&assessments);
        tracing::info!(
            items = summary.items_analyzed,
            flagged = summary.items_flagged,
            "Violation report generated"
        );
        (assessments, summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::model::{
        Action, Claim, ClaimType, CorroborationLevel, EvidenceStrength, Priority, SourceDescriptor,
        SourceFilterConfig, SourceHit, UNKNOWN, VerificationMethod,
    };
    use crate::service::corroboration::default_registry;
    use crate::sources::{FixtureLookup, LookupError, NoLookup, SourceLookup};

    const FIXTURES: &str = r#"
- source_id: wsiat-decisions
  title: Decision 1234/23
  url: https://www.wsiat.on.ca/decisions/1234-23
  text: The tribunal reviewed how WSIB denied the worker's claim.
- source_id: canlii
  title: Smith v. WSIB
  url: https://www.canlii.org/smith-v-wsib
  text: Appeal from a decision in which WSIB denied benefits.
"#;

    fn service(lookup: Arc<dyn SourceLookup>) -> AnalysisService {
        let engine = CorroborationEngine::new(
            lookup,
            default_registry(),
            SourceFilterConfig::default(),
            Duration::from_millis(200),
        );
        AnalysisService::new(
            engine,
            ClaimRuleSet::default(),
            ViolationRuleSet::default(),
            Duration::from_secs(5),
        )
    }

    fn input(text: &str) -> DocumentInput {
        DocumentInput {
            text: text.to_string(),
            source_url_or_id: "https://www.thestar.com/news/wsib-story".to_string(),
            fetch_date: Some("2024-05-01T12:00:00Z".to_string()),
            source_type: None,
            metadata_overrides: None,
        }
    }

    #[tokio::test]
    async fn test_empty_document_still_reports() {
        let report = service(Arc::new(NoLookup)).analyze(input("")).await.unwrap();

        assert!(report.entities.is_empty());
        assert!(report.claims.is_empty());
        assert!(report.relationships.is_empty());
        assert!(report.corroboration.is_empty());
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.priority, Priority::Low);
        assert_eq!(report.provenance.len(), 1);
        assert_eq!(report.provenance[0].source, "https://www.thestar.com/news/wsib-story");
        assert_eq!(report.provenance[0].verification, VerificationMethod::DirectIngestion);
        assert_eq!(report.metadata.title, UNKNOWN);
    }

    #[tokio::test]
    async fn test_wsib_scenario_with_fixtures() {
        let lookup = Arc::new(FixtureLookup::from_yaml(FIXTURES).unwrap());
        let report = service(lookup)
            .analyze(input("WSIB denied John Smith's claim for $50,000 in 2023"))
            .await
            .unwrap();

        assert_eq!(report.entities.people[0].name, "John Smith");
        assert_eq!(report.entities.organizations[0].name, "WSIB");
        assert_eq!(report.entities.money[0].amount, "50,000");
        assert_eq!(report.entities.dates[0].text, "2023");

        assert_eq!(report.claims.len(), 1);
        assert_eq!(report.claims[0].claim_type, ClaimType::Denial);
        assert_eq!(report.claims[0].alleged_actor, "WSIB");
        assert_eq!(report.claims[0].evidence_strength, EvidenceStrength::High);

        assert_eq!(report.corroboration.len(), 1);
        assert_eq!(report.corroboration[0].level, CorroborationLevel::Strong);
        // document, then one entry per corroborating source
        assert_eq!(report.provenance.len(), 3);
        assert!(report.id.len() > REPORT_ID_HASH_CHARS);
    }

    #[tokio::test]
    async fn test_idempotent_with_deterministic_backend() {
        let svc = service(Arc::new(FixtureLookup::from_yaml(FIXTURES).unwrap()));
        let text = "WSIB denied John Smith's claim for $50,000 in 2023. \
                    The Ministry of Labour was accused of fraud affecting injured workers.";

        let first = svc.analyze(input(text)).await.unwrap();
        let mut second = svc.analyze(input(text)).await.unwrap();

        assert_eq!(first.id[..REPORT_ID_HASH_CHARS], second.id[..REPORT_ID_HASH_CHARS]);
        second.id = first.id.clone();
        second.processing_time_ms = first.processing_time_ms;
        second.processed_at = first.processed_at;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_uncorroborated_claim_is_flagged() {
        let report = service(Arc::new(NoLookup))
            .analyze(input("The claimant said the appeal was refused."))
            .await
            .unwrap();

        assert_eq!(report.claims.len(), 1);
        assert!(report.corroboration[0].needs_further_investigation);
        assert_eq!(report.priority, Priority::Low);

        let kinds: Vec<_> = report.suggested_actions.iter().map(Action::kind).collect();
        assert_eq!(kinds, vec!["build_evidence_checklist", "flag_for_further_investigation"]);
        let Action::FlagForFurtherInvestigation(flag) = &report.suggested_actions[1] else {
            panic!("expected investigation flag")
        };
        assert_eq!(flag.claims, vec![report.claims[0].excerpt.clone()]);
    }

    #[tokio::test]
    async fn test_missing_fetch_date_fails_fast() {
        let mut bad = input("text");
        bad.fetch_date = None;
        let result = service(Arc::new(NoLookup)).analyze(bad).await;
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidInput(InputError::MissingFetchDate))
        ));
    }

    #[tokio::test]
    async fn test_batch_validates_everything_first() {
        let mut bad = input("second");
        bad.fetch_date = Some("yesterday".to_string());
        let result = service(Arc::new(NoLookup))
            .analyze_batch(vec![input("first"), bad])
            .await;
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidBatchItem { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let mut second = input("The worker was denied.");
        second.source_url_or_id = "doc-2".to_string();
        let reports = service(Arc::new(NoLookup))
            .analyze_batch(vec![input(""), second])
            .await
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].provenance[0].source, "https://www.thestar.com/news/wsib-story");
        assert_eq!(reports[1].provenance[0].source, "doc-2");
    }

    /// Never answers; used to push a run past its deadline
    struct HangingLookup;

    #[async_trait]
    impl SourceLookup for HangingLookup {
        async fn lookup(&self, _: &Claim, _: &SourceDescriptor) -> Result<Vec<SourceHit>, LookupError> {
            std::future::pending().await
        }

        fn backend(&self) -> &'static str {
            "hanging"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_discards_run() {
        let engine = CorroborationEngine::new(
            Arc::new(HangingLookup),
            default_registry(),
            SourceFilterConfig::default(),
            Duration::from_secs(3600),
        );
        let svc = AnalysisService::new(
            engine,
            ClaimRuleSet::default(),
            ViolationRuleSet::default(),
            Duration::from_secs(1),
        );
        let result = svc.analyze(input("Allegations of fraud at WSIB")).await;
        assert!(matches!(result, Err(AnalysisError::DeadlineExceeded(_))));
    }

    #[test]
    fn test_violation_report() {
        let svc = service(Arc::new(NoLookup));
        let (assessments, summary) = svc.violation_report(&[
            PolicyItem {
                title: "Bill 42".to_string(),
                description: "Will reduce income support".to_string(),
            },
            PolicyItem {
                title: "Road closures".to_string(),
                description: String::new(),
            },
        ]);
        assert_eq!(assessments.len(), 2);
        assert_eq!(summary.items_flagged, 1);
    }
}
