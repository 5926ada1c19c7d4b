//! One-shot pipeline: build, sync, validate.

use serde::Serialize;

use crate::builder::build_state;
use crate::config::EngineConfig;
use crate::diagnostic::{has_errors, sort_diagnostics, Diagnostic, DiagnosticSummary};
use crate::error::CoreError;
use crate::model::State;
use crate::records::{CandidateModel, SourceRecords};
use crate::sync::sync_models;
use crate::validation::validate;

/// Everything a status or validate command needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub state: State,
    /// Findings of all three stages, de-duplicated and in reporting order.
    pub diagnostics: Vec<Diagnostic>,
    pub summary: DiagnosticSummary,
    pub strict: bool,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }

    pub fn is_failing(&self) -> bool {
        self.summary.is_failing(self.strict)
    }

    /// Process exit status for a CLI wrapper: `1` when failing, else `0`.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.is_failing())
    }
}

/// Build a state from `records`, sync `models` into it and validate it.
///
/// Duplicate names are reported by both the builder and the validator; the
/// merged list keeps one copy.
pub fn run(
    records: SourceRecords,
    models: &[CandidateModel],
    config: &EngineConfig,
) -> Result<Report, CoreError> {
    let built = build_state(records)?;
    let synced = sync_models(&built.state, models, &config.sync);
    let findings = validate(&synced.state, &config.validation);

    let mut diagnostics = built.diagnostics;
    diagnostics.extend(synced.diagnostics);
    diagnostics.extend(findings);
    sort_diagnostics(&mut diagnostics);
    diagnostics.dedup();

    let summary = DiagnosticSummary::from_diagnostics(&diagnostics);
    tracing::info!(
        concepts = synced.state.concepts().len(),
        errors = summary.errors,
        warnings = summary.warnings,
        info = summary.info,
        "Conceptual model checked"
    );

    Ok(Report {
        state: synced.state,
        diagnostics,
        summary,
        strict: config.validation.strict,
    })
}
