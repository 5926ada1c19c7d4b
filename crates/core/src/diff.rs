//! Field-level comparison of two conceptual state snapshots.
//!
//! Entities correlate by name only. Each kind is compared over a fixed field
//! set; list fields compare as sets.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Concept, Domain, EntityKind, Relationship, State};

/// How an entity changed between two snapshots.
///
/// - `Added`    -- present only in the `after` snapshot.
/// - `Removed`  -- present only in the `before` snapshot.
/// - `Modified` -- present in both with at least one differing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }

    /// Marker used in change summaries.
    pub fn symbol(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Modified => '~',
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub kind: ChangeKind,
    pub entity_kind: EntityKind,
    pub name: String,
    /// Empty for added and removed entities.
    pub changed_fields: Vec<FieldChange>,
}

impl DiffEntry {
    pub fn field_names(&self) -> Vec<&str> {
        self.changed_fields.iter().map(|c| c.field.as_str()).collect()
    }
}

/// Counts per change kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut summary, e| {
            match e.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
                ChangeKind::Modified => summary.modified += 1,
            }
            summary
        })
    }

    pub fn is_empty(&self) -> bool {
        self.added + self.removed + self.modified == 0
    }
}

/// An entity comparable by a fixed list of named fields.
trait Diffable {
    const KIND: EntityKind;

    /// Field values in reporting order. List values must already be sorted
    /// and de-duplicated so that equality is set equality.
    fn diff_fields(&self) -> Vec<(&'static str, Value)>;
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

fn set(values: &[String]) -> Value {
    let sorted: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    Value::Array(sorted.into_iter().map(|v| Value::String(v.to_string())).collect())
}

impl Diffable for Domain {
    const KIND: EntityKind = EntityKind::Domain;

    fn diff_fields(&self) -> Vec<(&'static str, Value)> {
        let g = &self.governance;
        vec![
            ("display_name", text(Some(self.display_name.as_str()))),
            ("color", text(self.color.as_deref())),
            ("owner", text(g.owner.as_deref())),
            ("steward", text(g.steward.as_deref())),
            ("confidentiality", text(g.confidentiality.as_deref())),
            ("maturity", text(g.maturity.as_deref())),
        ]
    }
}

impl Diffable for Concept {
    const KIND: EntityKind = EntityKind::Concept;

    fn diff_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("description", text(self.description.as_deref())),
            ("domain", text(self.domain.as_deref())),
            ("owner", text(self.owner())),
            ("status", text(Some(self.status.as_str()))),
            ("color", text(self.color.as_deref())),
        ]
    }
}

impl Diffable for Relationship {
    const KIND: EntityKind = EntityKind::Relationship;

    fn diff_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("cardinality", text(Some(self.cardinality.as_str()))),
            ("description", text(self.description.as_deref())),
            ("realized_by", set(&self.realized_by)),
            ("from_concept", text(Some(self.from_concept.as_str()))),
            ("to_concept", text(Some(self.to_concept.as_str()))),
        ]
    }
}

/// Compare two snapshots.
///
/// Entries are grouped domains, concepts, relationships; within a kind they
/// are ordered added, removed, modified, then by name. Unchanged entities
/// are omitted.
pub fn diff_states(before: &State, after: &State) -> Vec<DiffEntry> {
    let mut entries = diff_kind(before.domains(), after.domains());
    entries.extend(diff_kind(before.concepts(), after.concepts()));
    entries.extend(diff_kind(before.relationships(), after.relationships()));

    let summary = DiffSummary::from_entries(&entries);
    tracing::debug!(
        added = summary.added,
        removed = summary.removed,
        modified = summary.modified,
        "Computed conceptual diff"
    );

    entries
}

fn diff_kind<T: Diffable>(
    before: &IndexMap<String, T>,
    after: &IndexMap<String, T>,
) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for (name, new) in after {
        match before.get(name) {
            None => entries.push(entry(ChangeKind::Added, T::KIND, name, Vec::new())),
            Some(old) => {
                let changes = changed_fields(old, new);
                if !changes.is_empty() {
                    entries.push(entry(ChangeKind::Modified, T::KIND, name, changes));
                }
            }
        }
    }
    for name in before.keys() {
        if !after.contains_key(name) {
            entries.push(entry(ChangeKind::Removed, T::KIND, name, Vec::new()));
        }
    }

    entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    entries
}

fn changed_fields<T: Diffable>(old: &T, new: &T) -> Vec<FieldChange> {
    old.diff_fields()
        .into_iter()
        .zip(new.diff_fields())
        .filter(|((_, a), (_, b))| a != b)
        .map(|((field, old), (_, new))| FieldChange {
            field: field.to_string(),
            old,
            new,
        })
        .collect()
}

fn entry(
    kind: ChangeKind,
    entity_kind: EntityKind,
    name: &str,
    changed: Vec<FieldChange>,
) -> DiffEntry {
    DiffEntry {
        kind,
        entity_kind,
        name: name.to_string(),
        changed_fields: changed,
    }
}
