//! Individual validation rules over a state.
//!
//! Each rule appends zero or more diagnostics to `out` and never looks at
//! what other rules found.

use std::collections::HashSet;

use crate::config::{Taxonomy, ValidationConfig};
use crate::diagnostic::{Diagnostic, Rule, SubjectKind};
use crate::model::{Governance, RelationshipStatus, State, Status};

/// Signature shared by every rule.
pub type RuleCheck = fn(&State, &ValidationConfig, &mut Vec<Diagnostic>);

/// Records dropped at build time for reusing a name.
pub fn duplicate_names(state: &State, _config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    out.extend(state.duplicates().iter().map(|d| d.diagnostic()));
}

/// Concepts naming a domain that does not exist. One error per concept.
pub fn dangling_domains(state: &State, _config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    for concept in state.concepts().values() {
        let Some(domain) = concept.domain.as_deref() else {
            continue;
        };
        if state.domain(domain).is_none() {
            out.push(Diagnostic::error(
                Rule::DanglingDomain,
                SubjectKind::Concept,
                &concept.name,
                format!(
                    "Concept '{}' references unknown domain '{domain}'",
                    concept.name
                ),
            ));
        }
    }
}

/// Relationship endpoints naming a concept that does not exist.
pub fn dangling_endpoints(state: &State, _config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    for rel in state.relationships().values() {
        for (end, concept) in [("source", &rel.from_concept), ("target", &rel.to_concept)] {
            if state.concept(concept).is_none() {
                out.push(Diagnostic::error(
                    Rule::DanglingEndpoint,
                    SubjectKind::Relationship,
                    &rel.name,
                    format!(
                        "Relationship '{}' {end} references unknown concept '{concept}'",
                        rel.name
                    ),
                ));
            }
        }
    }
}

pub fn stub_concepts(state: &State, _config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    for concept in state.concepts().values() {
        if concept.domain.is_none() {
            out.push(Diagnostic::warning(
                Rule::StubConcept,
                SubjectKind::Concept,
                &concept.name,
                format!("Concept '{}' has no domain", concept.name),
            ));
        }
    }
}

/// Concepts with no owner after inheritance, when owners are required.
pub fn ungoverned_concepts(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    if !config.require_owner {
        return;
    }
    for concept in state.concepts().values() {
        if concept.owner().is_none() {
            out.push(Diagnostic::warning(
                Rule::UngovernedConcept,
                SubjectKind::Concept,
                &concept.name,
                format!("Concept '{}' has no owner", concept.name),
            ));
        }
    }
}

/// Governance values outside the configured taxonomy.
///
/// Values are checked where they are declared: domain defaults against the
/// domain, concept overrides against the concept. A concept that merely
/// inherits a bad domain value is not reported a second time.
pub fn taxonomy_violations(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    let Some(taxonomy) = config.taxonomy.as_ref() else {
        return;
    };
    for domain in state.domains().values() {
        check_governance(
            taxonomy,
            &domain.governance,
            SubjectKind::Domain,
            &domain.name,
            out,
        );
    }
    for concept in state.concepts().values() {
        check_governance(
            taxonomy,
            &concept.overrides,
            SubjectKind::Concept,
            &concept.name,
            out,
        );
    }
}

fn check_governance(
    taxonomy: &Taxonomy,
    governance: &Governance,
    kind: SubjectKind,
    subject: &str,
    out: &mut Vec<Diagnostic>,
) {
    let mut violation = |field: &str, value: &str| {
        out.push(Diagnostic::error(
            Rule::TaxonomyViolation,
            kind,
            subject,
            format!("'{subject}' has {field} '{value}' outside the allowed taxonomy"),
        ));
    };
    if let Some(value) = governance.confidentiality.as_deref() {
        if !taxonomy.allows_confidentiality(value) {
            violation("confidentiality", value);
        }
    }
    if let Some(value) = governance.maturity.as_deref() {
        if !taxonomy.allows_maturity(value) {
            violation("maturity", value);
        }
    }
    for tag in &governance.regulatory_tags {
        if !taxonomy.allows_regulatory_tag(tag) {
            violation("regulatory tag", tag);
        }
    }
}

/// Relationships between two complete concepts that document no join model.
pub fn unrealized_relationships(
    state: &State,
    _config: &ValidationConfig,
    out: &mut Vec<Diagnostic>,
) {
    let complete = |name: &str| {
        state
            .concept(name)
            .is_some_and(|c| c.status == Status::Complete)
    };
    for rel in state.relationships().values() {
        if rel.realized_by.is_empty() && complete(&rel.from_concept) && complete(&rel.to_concept) {
            out.push(Diagnostic::info(
                Rule::UnrealizedRelationship,
                SubjectKind::Relationship,
                &rel.name,
                format!(
                    "Relationship '{}' connects two complete concepts but lists no realizing models",
                    rel.name
                ),
            ));
        }
    }
}

pub fn orphan_models(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    for orphan in state.orphan_models() {
        let Some(severity) = config.orphan_severity(orphan.layer) else {
            continue;
        };
        out.push(Diagnostic::new(
            severity,
            Rule::OrphanModel,
            SubjectKind::Model,
            &orphan.identifier,
            format!(
                "Model '{}' ({} layer) is not linked to any concept",
                orphan.identifier, orphan.layer
            ),
        ));
    }
}

/// Live concepts with no models in any layer.
pub fn unimplemented_concepts(
    state: &State,
    config: &ValidationConfig,
    out: &mut Vec<Diagnostic>,
) {
    let Some(severity) = config.unimplemented_severity() else {
        return;
    };
    for concept in state.concepts().values() {
        if concept.status != Status::Deprecated && !concept.has_models() {
            out.push(Diagnostic::new(
                severity,
                Rule::UnimplementedConcept,
                SubjectKind::Concept,
                &concept.name,
                format!("Concept '{}' has no implementing models", concept.name),
            ));
        }
    }
}

/// Non-stub concepts and all relationships without a description.
pub fn missing_descriptions(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    let Some(severity) = config.missing_description_severity() else {
        return;
    };
    for concept in state.concepts().values() {
        if concept.status != Status::Stub && concept.description.is_none() {
            out.push(Diagnostic::new(
                severity,
                Rule::MissingDescription,
                SubjectKind::Concept,
                &concept.name,
                format!("Concept '{}' is missing a description", concept.name),
            ));
        }
    }
    for rel in state.relationships().values() {
        if rel.description.is_none() {
            out.push(Diagnostic::new(
                severity,
                Rule::MissingDescription,
                SubjectKind::Relationship,
                &rel.name,
                format!("Relationship '{}' is missing a description", rel.name),
            ));
        }
    }
}

pub fn empty_domains(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    let Some(severity) = config.empty_domains.severity() else {
        return;
    };
    let used: HashSet<&str> = state
        .concepts()
        .values()
        .filter_map(|c| c.domain.as_deref())
        .collect();
    for domain in state.domains().values() {
        if !used.contains(domain.name.as_str()) {
            out.push(Diagnostic::new(
                severity,
                Rule::EmptyDomain,
                SubjectKind::Domain,
                &domain.name,
                format!("Domain '{}' has no concepts", domain.name),
            ));
        }
    }
}

/// Stub and draft concepts still missing a domain, an owner or a
/// description.
pub fn draft_enrichment(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    let Some(severity) = config.enrichment_severity() else {
        return;
    };
    for concept in state.concepts().values() {
        if !matches!(concept.status, Status::Stub | Status::Draft) {
            continue;
        }
        let mut missing = Vec::new();
        if concept.domain.is_none() {
            missing.push("domain");
        }
        if concept.owner().is_none() {
            missing.push("owner");
        }
        if concept.description.is_none() {
            missing.push("description");
        }
        if missing.is_empty() {
            continue;
        }
        out.push(Diagnostic::new(
            severity,
            Rule::NeedsEnrichment,
            SubjectKind::Concept,
            &concept.name,
            format!(
                "Concept '{}' ({}) needs enrichment: missing {}",
                concept.name,
                concept.status,
                missing.join(", ")
            ),
        ));
    }
}

/// Relationships with an undefined or stub endpoint.
pub fn stub_relationships(state: &State, config: &ValidationConfig, out: &mut Vec<Diagnostic>) {
    let Some(severity) = config.enrichment_severity() else {
        return;
    };
    for rel in state.relationships().values() {
        if state.relationship_status(rel) != RelationshipStatus::Stub {
            continue;
        }
        let message = if rel.description.is_none() {
            format!(
                "Stub relationship '{}' needs enrichment: missing description",
                rel.name
            )
        } else {
            format!(
                "Stub relationship '{}' has an undefined or stub endpoint",
                rel.name
            )
        };
        out.push(Diagnostic::new(
            severity,
            Rule::StubRelationship,
            SubjectKind::Relationship,
            &rel.name,
            message,
        ));
    }
}
