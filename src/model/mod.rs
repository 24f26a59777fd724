pub mod action;
pub mod claim;
pub mod config;
pub mod corroboration;
pub mod document;
pub mod entity;
pub mod provenance;
pub mod report;
pub mod risk;
pub mod violation;

pub use action::*;
pub use claim::*;
pub use config::{Config, CorroborationConfig, LookupBackend, SourceFilterConfig};
pub use corroboration::*;
pub use document::*;
pub use entity::*;
pub use provenance::*;
pub use report::*;
pub use risk::*;
pub use violation::*;
