//! Coverage statistics over a synced state.
//!
//! Pure computation for status views and coverage dashboards; rendering is
//! left to the caller.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{RelationshipStatus, State, Status};

/// Group label for concepts without a domain.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub complete: usize,
    pub draft: usize,
    pub stub: usize,
    pub deprecated: usize,
}

impl StatusCounts {
    fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Complete => self.complete += 1,
            Status::Draft => self.draft += 1,
            Status::Stub => self.stub += 1,
            Status::Deprecated => self.deprecated += 1,
        }
    }
}

/// Per-domain concept counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCoverage {
    pub domain: String,
    pub concepts: StatusCounts,
    pub completion_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub concepts: StatusCounts,
    pub concepts_with_models: usize,
    pub total_relationships: usize,
    pub complete_relationships: usize,
    pub orphan_models: usize,
    pub completion_pct: u8,
    pub model_coverage_pct: u8,
    pub relationship_pct: u8,
    /// Declared domains first in input order, then undeclared ones as they
    /// are first referenced, then `uncategorized`.
    pub by_domain: Vec<DomainCoverage>,
}

/// Integer percentage, rounded down. Returns 0 if `total` is 0.
pub fn compute_pct(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (part.min(total) * 100 / total) as u8
}

pub fn summarize(state: &State) -> CoverageSummary {
    let mut concepts = StatusCounts::default();
    let mut groups: IndexMap<&str, StatusCounts> = state
        .domains()
        .keys()
        .map(|name| (name.as_str(), StatusCounts::default()))
        .collect();
    let mut uncategorized = StatusCounts::default();

    for concept in state.concepts().values() {
        concepts.record(concept.status);
        match concept.domain.as_deref() {
            Some(domain) => groups.entry(domain).or_default().record(concept.status),
            None => uncategorized.record(concept.status),
        }
    }

    let concepts_with_models = state
        .concepts()
        .values()
        .filter(|c| c.has_models())
        .count();
    let total_relationships = state.relationships().len();
    let complete_relationships = state
        .relationships()
        .values()
        .filter(|r| state.relationship_status(r) == RelationshipStatus::Complete)
        .count();

    let mut by_domain: Vec<DomainCoverage> = groups
        .into_iter()
        .map(|(domain, counts)| DomainCoverage {
            domain: domain.to_string(),
            completion_pct: compute_pct(counts.complete, counts.total),
            concepts: counts,
        })
        .collect();
    if uncategorized.total > 0 {
        by_domain.push(DomainCoverage {
            domain: UNCATEGORIZED.to_string(),
            completion_pct: compute_pct(uncategorized.complete, uncategorized.total),
            concepts: uncategorized,
        });
    }

    CoverageSummary {
        completion_pct: compute_pct(concepts.complete, concepts.total),
        model_coverage_pct: compute_pct(concepts_with_models, concepts.total),
        relationship_pct: compute_pct(complete_relationships, total_relationships),
        concepts,
        concepts_with_models,
        total_relationships,
        complete_relationships,
        orphan_models: state.orphan_models().len(),
        by_domain,
    }
}
