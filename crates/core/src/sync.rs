//! Sync engine: assigns candidate models to concepts and re-derives status.
//!
//! Buckets are rebuilt from scratch on every call, so running the sync twice
//! with the same candidates yields the same state.

use std::collections::HashSet;

use crate::config::SyncConfig;
use crate::diagnostic::{sort_diagnostics, Diagnostic, Rule, SubjectKind};
use crate::model::{Layer, OrphanModel, State};
use crate::records::CandidateModel;

/// The synced state with diagnostics for the implicit actions taken.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub state: State,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assign `models` to the concepts of `state`.
///
/// A model matches a concept only when its tag equals the concept name
/// exactly. Matched models are appended to the bucket of their layer in
/// input order; a model lands at most once per concept and layer.
pub fn sync_models(state: &State, models: &[CandidateModel], config: &SyncConfig) -> SyncOutcome {
    let mut next = state.clone();
    next.orphan_models.clear();
    for concept in next.concepts.values_mut() {
        concept.clear_models();
    }

    let mut diagnostics = Vec::new();
    let mut placed: HashSet<(&str, Layer, &str)> = HashSet::with_capacity(models.len());
    let mut orphans: HashSet<&str> = HashSet::new();
    let mut matched = 0usize;
    let mut unknown = 0usize;

    for model in models {
        let tag = model
            .tagged_concept
            .as_deref()
            .filter(|t| !t.trim().is_empty());

        let Some(tag) = tag else {
            if orphans.insert(model.identifier.as_str()) {
                next.orphan_models.push(OrphanModel {
                    identifier: model.identifier.clone(),
                    layer: model.layer,
                });
            }
            continue;
        };

        let Some(concept) = next.concepts.get_mut(tag) else {
            unknown += 1;
            if let Some(severity) = config.unknown_concept.severity() {
                diagnostics.push(Diagnostic::new(
                    severity,
                    Rule::UnknownConcept,
                    SubjectKind::Model,
                    &model.identifier,
                    format!(
                        "Model '{}' ({} layer) is tagged with unknown concept '{tag}'",
                        model.identifier, model.layer
                    ),
                ));
            }
            continue;
        };

        if placed.insert((tag, model.layer, model.identifier.as_str())) {
            concept.models_mut(model.layer).push(model.identifier.clone());
            matched += 1;
        } else {
            diagnostics.push(Diagnostic::info(
                Rule::DuplicateModel,
                SubjectKind::Concept,
                tag,
                format!(
                    "Model '{}' is listed more than once for {} layer of concept '{tag}'",
                    model.identifier, model.layer
                ),
            ));
        }
    }

    for concept in next.concepts.values_mut() {
        concept.status = concept.derive_status();
    }
    sort_diagnostics(&mut diagnostics);

    tracing::debug!(
        candidates = models.len(),
        matched,
        unknown,
        orphans = next.orphan_models.len(),
        "Synced models into conceptual state"
    );

    SyncOutcome {
        state: next,
        diagnostics,
    }
}
