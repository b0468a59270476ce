//! Indicator registry, submission validation, and the authoring test panel.
//!
//! The registry persists `IndicatorDefinition`s behind a repository trait;
//! validation reads them and delegates every status decision to the
//! calculation engine.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentStage, IndicatorDefinition, IndicatorId, ValidationReport, ValidationStatusView,
};
pub use repository::{InMemoryIndicatorRepository, IndicatorRepository, RepositoryError};
pub use router::indicator_router;
pub use service::{IndicatorValidationService, ValidationServiceError};
