//! Source records handed to the engine by the project-file loader.
//!
//! These are plain deserializable shapes; the builder owns all semantic
//! checks.

use serde::{Deserialize, Serialize};

use crate::model::{Governance, Layer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: String,
    /// Falls back to `name` when absent.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, flatten)]
    pub governance: Governance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, flatten)]
    pub governance: Governance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Explicit key. Without one the relationship is keyed
    /// `{from}:{verb}:{to}`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub verb: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub cardinality: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub realized_by: Vec<String>,
}

/// All conceptual records of one project snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecords {
    pub domains: Vec<DomainRecord>,
    pub concepts: Vec<ConceptRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

/// An implementing model offered to the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateModel {
    pub identifier: String,
    pub layer: Layer,
    /// Concept named by the model's metadata. Untagged models are orphans.
    #[serde(default)]
    pub tagged_concept: Option<String>,
}

impl CandidateModel {
    pub fn tagged(identifier: &str, layer: Layer, concept: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            layer,
            tagged_concept: Some(concept.to_string()),
        }
    }

    pub fn untagged(identifier: &str, layer: Layer) -> Self {
        Self {
            identifier: identifier.to_string(),
            layer,
            tagged_concept: None,
        }
    }
}
