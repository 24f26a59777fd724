//! Provenance trail: the ingested document first, then every corroborating hit in
//! claim order. Entries are only ever appended; a source cited by two claims appears twice.

use crate::model::{CorroborationResult, Document, ProvenanceEntry, VerificationMethod};
use crate::service::text::truncate_chars;

const DOCUMENT_SNIPPET_CHARS: usize = 200;

pub fn compile_provenance(doc: &Document, corroboration: &[CorroborationResult]) -> Vec<ProvenanceEntry> {
    let mut entries = vec![ProvenanceEntry {
        source: doc.source.clone(),
        url: doc.source.clone(),
        snippet: truncate_chars(doc.text.trim(), DOCUMENT_SNIPPET_CHARS),
        retrieved_at: doc.fetched_at,
        verification: VerificationMethod::DirectIngestion,
        claim_index: None,
    }];

    for result in corroboration {
        entries.extend(result.hits.iter().map(|hit| ProvenanceEntry {
            source: hit.source_name.clone(),
            url: hit.url.clone(),
            snippet: hit.snippet.clone(),
            retrieved_at: hit.retrieved_at,
            verification: VerificationMethod::CrossReference,
            claim_index: Some(result.claim_index),
        }));
    }

    entries
}
