//! Graph builder: merges raw records into one inheritance-resolved [`State`].
//!
//! Construction is best-effort. Duplicate names keep the first record and
//! produce an error diagnostic; dangling references are left for the
//! validator. Only a record with no name aborts the build.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::diagnostic::{sort_diagnostics, Diagnostic, Rule, SubjectKind};
use crate::error::CoreError;
use crate::model::{
    non_blank, Cardinality, Concept, Domain, DuplicateRecord, EntityKind, Relationship, State,
    Status, DEFAULT_VERB,
};
use crate::records::{ConceptRecord, DomainRecord, RelationshipRecord, SourceRecords};

/// A freshly built state with the problems found while building it.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub state: State,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build a [`State`] from source records.
pub fn build_state(records: SourceRecords) -> Result<BuildOutcome, CoreError> {
    let mut diagnostics = Vec::new();
    let mut duplicates = Vec::new();

    let domains = index_by_name(
        EntityKind::Domain,
        records.domains,
        |record| record.name.clone(),
        build_domain,
        &mut duplicates,
    )?;

    let concepts = index_by_name(
        EntityKind::Concept,
        records.concepts,
        |record| record.name.clone(),
        |name, record| build_concept(name, record, &domains),
        &mut duplicates,
    )?;

    let relationships = index_by_name(
        EntityKind::Relationship,
        records.relationships,
        relationship_key,
        |name, record| {
            let (relationship, normalized) = build_relationship(name, record);
            if let Some(raw) = normalized {
                diagnostics.push(Diagnostic::warning(
                    Rule::CardinalityNormalized,
                    SubjectKind::Relationship,
                    &relationship.name,
                    format!(
                        "Relationship '{}' has unsupported cardinality '{raw}', using '{}'",
                        relationship.name,
                        relationship.cardinality.as_str()
                    ),
                ));
            }
            relationship
        },
        &mut duplicates,
    )?;

    diagnostics.extend(duplicates.iter().map(DuplicateRecord::diagnostic));
    sort_diagnostics(&mut diagnostics);

    tracing::debug!(
        domains = domains.len(),
        concepts = concepts.len(),
        relationships = relationships.len(),
        duplicates = duplicates.len(),
        "Built conceptual state"
    );

    Ok(BuildOutcome {
        state: State {
            domains,
            concepts,
            relationships,
            duplicates,
            orphan_models: Vec::new(),
        },
        diagnostics,
    })
}

/// Index records by name in input order, keeping the first of any repeat.
fn index_by_name<R, T>(
    kind: EntityKind,
    records: Vec<R>,
    key: impl Fn(&R) -> String,
    mut build: impl FnMut(String, R) -> T,
    duplicates: &mut Vec<DuplicateRecord>,
) -> Result<IndexMap<String, T>, CoreError> {
    let mut map = IndexMap::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        let name = key(&record);
        if name.trim().is_empty() {
            tracing::warn!(kind = %kind, position, "Rejected record without a name");
            return Err(CoreError::MissingName { kind, position });
        }
        match map.entry(name) {
            Entry::Occupied(entry) => duplicates.push(DuplicateRecord {
                kind,
                name: entry.key().clone(),
                position,
            }),
            Entry::Vacant(entry) => {
                let value = build(entry.key().clone(), record);
                entry.insert(value);
            }
        }
    }
    Ok(map)
}

fn build_domain(name: String, record: DomainRecord) -> Domain {
    Domain {
        display_name: non_blank(record.display_name).unwrap_or_else(|| name.clone()),
        name,
        color: non_blank(record.color),
        governance: record.governance.normalized(),
    }
}

fn build_concept(
    name: String,
    record: ConceptRecord,
    domains: &IndexMap<String, Domain>,
) -> Concept {
    let domain = non_blank(record.domain);
    let overrides = record.governance.normalized();
    let governance = overrides.resolve(
        domain
            .as_deref()
            .and_then(|d| domains.get(d))
            .map(|d| &d.governance),
    );
    Concept {
        status: Status::derive(record.deprecated, domain.is_some(), 0),
        name,
        domain,
        description: non_blank(record.description),
        color: non_blank(record.color),
        deprecated: record.deprecated,
        overrides,
        governance,
        bronze_models: Vec::new(),
        silver_models: Vec::new(),
        gold_models: Vec::new(),
    }
}

/// An unnamed relationship is keyed by its endpoints. Without both it has no
/// key, and the blank result is rejected as a missing name.
fn relationship_key(record: &RelationshipRecord) -> String {
    match non_blank(record.name.clone()) {
        Some(name) => name,
        None if record.from.trim().is_empty() || record.to.trim().is_empty() => String::new(),
        None => {
            let verb = non_blank(record.verb.clone());
            format!(
                "{}:{}:{}",
                record.from,
                verb.as_deref().unwrap_or(DEFAULT_VERB),
                record.to
            )
        }
    }
}

/// Returns the relationship and, if its cardinality had to be replaced,
/// the raw value that was rejected.
fn build_relationship(name: String, record: RelationshipRecord) -> (Relationship, Option<String>) {
    let raw_cardinality = non_blank(record.cardinality);
    let parsed = raw_cardinality.as_deref().map(Cardinality::parse);
    let (cardinality, rejected) = match parsed {
        None => (Cardinality::default(), None),
        Some(Some(cardinality)) => (cardinality, None),
        Some(None) => (Cardinality::default(), raw_cardinality),
    };
    let relationship = Relationship {
        name,
        verb: non_blank(record.verb),
        from_concept: record.from,
        to_concept: record.to,
        cardinality,
        description: non_blank(record.description),
        realized_by: record.realized_by,
    };
    (relationship, rejected)
}
