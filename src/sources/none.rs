use async_trait::async_trait;

use super::{LookupError, SourceLookup};
use crate::model::{Claim, SourceDescriptor, SourceHit};

/// Backend that never finds anything; every claim ends up weakly corroborated
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

#[async_trait]
impl SourceLookup for NoLookup {
    async fn lookup(
        &self,
        _claim: &Claim,
        _source: &SourceDescriptor,
    ) -> Result<Vec<SourceHit>, LookupError> {
        Ok(Vec::new())
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
