//! Rule evaluator: runs every rule and returns one ordered diagnostic list.

use super::rules::{self, RuleCheck};
use crate::config::ValidationConfig;
use crate::diagnostic::{sort_diagnostics, Diagnostic, DiagnosticSummary, Rule};
use crate::model::State;

const RULES: &[(Rule, RuleCheck)] = &[
    (Rule::DuplicateName, rules::duplicate_names),
    (Rule::DanglingDomain, rules::dangling_domains),
    (Rule::DanglingEndpoint, rules::dangling_endpoints),
    (Rule::StubConcept, rules::stub_concepts),
    (Rule::UngovernedConcept, rules::ungoverned_concepts),
    (Rule::TaxonomyViolation, rules::taxonomy_violations),
    (Rule::UnrealizedRelationship, rules::unrealized_relationships),
    (Rule::OrphanModel, rules::orphan_models),
    (Rule::UnimplementedConcept, rules::unimplemented_concepts),
    (Rule::MissingDescription, rules::missing_descriptions),
    (Rule::EmptyDomain, rules::empty_domains),
    (Rule::NeedsEnrichment, rules::draft_enrichment),
    (Rule::StubRelationship, rules::stub_relationships),
];

/// Validate `state`, reporting every finding of every rule.
pub fn validate(state: &State, config: &ValidationConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (rule, check) in RULES {
        let before = diagnostics.len();
        check(state, config, &mut diagnostics);
        tracing::trace!(rule = %rule, found = diagnostics.len() - before, "Evaluated rule");
    }

    sort_diagnostics(&mut diagnostics);

    let summary = DiagnosticSummary::from_diagnostics(&diagnostics);
    tracing::debug!(
        errors = summary.errors,
        warnings = summary.warnings,
        info = summary.info,
        "Validated conceptual state"
    );

    diagnostics
}
