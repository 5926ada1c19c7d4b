//! Conceptual-model engine.
//!
//! Keeps a graph of domains, concepts and relationships in step with the
//! models that implement it. The crate is pure logic: records come in from a
//! loader, values go out to whatever renders them.

pub mod builder;
pub mod config;
pub mod coverage;
pub mod diagnostic;
pub mod diff;
pub mod engine;
pub mod error;
pub mod model;
pub mod records;
pub mod sync;
pub mod validation;

pub use builder::{build_state, BuildOutcome};
pub use config::{EngineConfig, RuleSeverity, SyncConfig, Taxonomy, ValidationConfig};
pub use diagnostic::{Diagnostic, DiagnosticSummary, Rule, Severity, SubjectKind};
pub use diff::{diff_states, ChangeKind, DiffEntry, DiffSummary, FieldChange};
pub use engine::{run, Report};
pub use error::CoreError;
pub use model::{Concept, Domain, EntityKind, Governance, Layer, Relationship, State, Status};
pub use records::{
    CandidateModel, ConceptRecord, DomainRecord, RelationshipRecord, SourceRecords,
};
pub use sync::{sync_models, SyncOutcome};
pub use validation::validate;
