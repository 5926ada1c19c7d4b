//! Conceptual graph entities and the `State` aggregate.
//!
//! A [`State`] is produced by the builder, rebuilt with model buckets by the
//! sync engine, and read (never mutated) by the validator, the diff engine
//! and the coverage summary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Rule, SubjectKind};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const LAYER_BRONZE: &str = "bronze";
pub const LAYER_SILVER: &str = "silver";
pub const LAYER_GOLD: &str = "gold";

pub const STATUS_STUB: &str = "stub";
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_COMPLETE: &str = "complete";
pub const STATUS_DEPRECATED: &str = "deprecated";

/// Verb used to key relationships that carry neither a name nor a verb.
pub const DEFAULT_VERB: &str = "relates_to";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Implementation tier a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => LAYER_BRONZE,
            Self::Silver => LAYER_SILVER,
            Self::Gold => LAYER_GOLD,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived coverage state of a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Stub,
    Draft,
    Complete,
    Deprecated,
}

impl Status {
    /// Derive a concept status. The first matching rule wins:
    ///
    /// 1. explicit deprecation -> `Deprecated`
    /// 2. no domain -> `Stub`
    /// 3. no silver or gold models -> `Draft`
    /// 4. otherwise -> `Complete`
    pub fn derive(deprecated: bool, has_domain: bool, silver_gold_models: usize) -> Self {
        if deprecated {
            Self::Deprecated
        } else if !has_domain {
            Self::Stub
        } else if silver_gold_models == 0 {
            Self::Draft
        } else {
            Self::Complete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stub => STATUS_STUB,
            Self::Draft => STATUS_DRAFT,
            Self::Complete => STATUS_COMPLETE,
            Self::Deprecated => STATUS_DEPRECATED,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived state of a relationship, based on its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    /// An endpoint is undefined or is itself a stub.
    Stub,
    Complete,
}

/// Relationship cardinality. Only one-to-one and one-to-many are modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[default]
    #[serde(rename = "1:N")]
    OneToMany,
}

impl Cardinality {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1:1" => Some(Self::OneToOne),
            "1:N" | "1:n" => Some(Self::OneToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:N",
        }
    }
}

/// The three entity kinds of the conceptual graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Domain,
    Concept,
    Relationship,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Concept => "concept",
            Self::Relationship => "relationship",
        }
    }

    pub fn subject_kind(&self) -> SubjectKind {
        match self {
            Self::Domain => SubjectKind::Domain,
            Self::Concept => SubjectKind::Concept,
            Self::Relationship => SubjectKind::Relationship,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

/// Governance metadata: defaults on a domain, overrides on a concept.
///
/// An empty `regulatory_tags` list counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Governance {
    pub owner: Option<String>,
    pub steward: Option<String>,
    pub confidentiality: Option<String>,
    pub maturity: Option<String>,
    pub regulatory_tags: Vec<String>,
}

impl Governance {
    /// Two-level merge: every field set on `self` wins, gaps are filled
    /// from `fallback`.
    pub fn resolve(&self, fallback: Option<&Governance>) -> Governance {
        let Some(fallback) = fallback else {
            return self.clone();
        };
        Governance {
            owner: self.owner.clone().or_else(|| fallback.owner.clone()),
            steward: self.steward.clone().or_else(|| fallback.steward.clone()),
            confidentiality: self
                .confidentiality
                .clone()
                .or_else(|| fallback.confidentiality.clone()),
            maturity: self.maturity.clone().or_else(|| fallback.maturity.clone()),
            regulatory_tags: if self.regulatory_tags.is_empty() {
                fallback.regulatory_tags.clone()
            } else {
                self.regulatory_tags.clone()
            },
        }
    }

    /// Blank strings from the loader are treated as absent.
    pub(crate) fn normalized(self) -> Governance {
        Governance {
            owner: non_blank(self.owner),
            steward: non_blank(self.steward),
            confidentiality: non_blank(self.confidentiality),
            maturity: non_blank(self.maturity),
            regulatory_tags: self
                .regulatory_tags
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A grouping of concepts under shared governance defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub name: String,
    pub display_name: String,
    pub color: Option<String>,
    pub governance: Governance,
}

/// A named business entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    pub name: String,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub deprecated: bool,
    pub status: Status,
    /// Values set explicitly on the concept record.
    pub overrides: Governance,
    /// `overrides` merged with the owning domain's defaults at build time.
    pub governance: Governance,
    pub bronze_models: Vec<String>,
    pub silver_models: Vec<String>,
    pub gold_models: Vec<String>,
}

impl Concept {
    pub fn owner(&self) -> Option<&str> {
        self.governance.owner.as_deref()
    }

    pub fn models(&self, layer: Layer) -> &[String] {
        match layer {
            Layer::Bronze => &self.bronze_models,
            Layer::Silver => &self.silver_models,
            Layer::Gold => &self.gold_models,
        }
    }

    pub(crate) fn models_mut(&mut self, layer: Layer) -> &mut Vec<String> {
        match layer {
            Layer::Bronze => &mut self.bronze_models,
            Layer::Silver => &mut self.silver_models,
            Layer::Gold => &mut self.gold_models,
        }
    }

    pub(crate) fn clear_models(&mut self) {
        self.bronze_models.clear();
        self.silver_models.clear();
        self.gold_models.clear();
    }

    /// Number of silver and gold models, the count that drives status.
    pub fn implementation_count(&self) -> usize {
        self.silver_models.len() + self.gold_models.len()
    }

    pub fn has_models(&self) -> bool {
        Layer::ALL.iter().any(|layer| !self.models(*layer).is_empty())
    }

    pub fn derive_status(&self) -> Status {
        Status::derive(
            self.deprecated,
            self.domain.is_some(),
            self.implementation_count(),
        )
    }
}

/// A named, directed association between two concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub name: String,
    pub verb: Option<String>,
    pub from_concept: String,
    pub to_concept: String,
    pub cardinality: Cardinality,
    pub description: Option<String>,
    pub realized_by: Vec<String>,
}

/// A record discarded because its name was already taken within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub kind: EntityKind,
    pub name: String,
    /// Zero-based position of the discarded record in its input list.
    pub position: usize,
}

impl DuplicateRecord {
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            Rule::DuplicateName,
            self.kind.subject_kind(),
            &self.name,
            format!(
                "Duplicate {} name '{}': record at position {} was discarded",
                self.kind, self.name, self.position
            ),
        )
    }
}

/// A candidate model that carried no concept tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanModel {
    pub identifier: String,
    pub layer: Layer,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// A full snapshot of the conceptual graph.
///
/// Maps keep input order for iteration; equality ignores that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    pub(crate) domains: IndexMap<String, Domain>,
    pub(crate) concepts: IndexMap<String, Concept>,
    pub(crate) relationships: IndexMap<String, Relationship>,
    pub(crate) duplicates: Vec<DuplicateRecord>,
    pub(crate) orphan_models: Vec<OrphanModel>,
}

impl State {
    pub fn domains(&self) -> &IndexMap<String, Domain> {
        &self.domains
    }

    pub fn concepts(&self) -> &IndexMap<String, Concept> {
        &self.concepts
    }

    pub fn relationships(&self) -> &IndexMap<String, Relationship> {
        &self.relationships
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name)
    }

    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.get(name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// Records dropped during construction for reusing a name.
    pub fn duplicates(&self) -> &[DuplicateRecord] {
        &self.duplicates
    }

    /// Untagged candidate models seen by the last sync.
    pub fn orphan_models(&self) -> &[OrphanModel] {
        &self.orphan_models
    }

    pub fn relationship_status(&self, relationship: &Relationship) -> RelationshipStatus {
        let endpoint_ready = |name: &str| {
            self.concepts
                .get(name)
                .is_some_and(|c| c.status != Status::Stub)
        };
        if endpoint_ready(&relationship.from_concept) && endpoint_ready(&relationship.to_concept) {
            RelationshipStatus::Complete
        } else {
            RelationshipStatus::Stub
        }
    }
}
