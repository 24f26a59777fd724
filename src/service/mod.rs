pub mod actions;
pub mod analysis;
pub mod cache;
pub mod cache_keys;
pub mod claims;
pub mod corroboration;
pub mod entities;
pub mod metadata;
pub mod patterns;
pub mod provenance;
pub mod relationships;
pub mod risk;
pub mod text;
pub mod violations;

pub use analysis::{AnalysisError, AnalysisService};
pub use cache::LookupCache;
pub use claims::ClaimRuleSet;
pub use corroboration::CorroborationEngine;
pub use violations::ViolationRuleSet;
