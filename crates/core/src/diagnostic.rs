//! Diagnostic types shared by the builder, sync engine and validator.

use serde::{Deserialize, Serialize};

/// How serious a finding is. Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    DuplicateName,
    DanglingDomain,
    DanglingEndpoint,
    StubConcept,
    UngovernedConcept,
    TaxonomyViolation,
    UnrealizedRelationship,
    UnknownConcept,
    DuplicateModel,
    OrphanModel,
    UnimplementedConcept,
    MissingDescription,
    EmptyDomain,
    NeedsEnrichment,
    StubRelationship,
    CardinalityNormalized,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateName => "duplicate-name",
            Self::DanglingDomain => "dangling-domain",
            Self::DanglingEndpoint => "dangling-endpoint",
            Self::StubConcept => "stub-concept",
            Self::UngovernedConcept => "ungoverned-concept",
            Self::TaxonomyViolation => "taxonomy-violation",
            Self::UnrealizedRelationship => "unrealized-relationship",
            Self::UnknownConcept => "unknown-concept",
            Self::DuplicateModel => "duplicate-model",
            Self::OrphanModel => "orphan-model",
            Self::UnimplementedConcept => "unimplemented-concept",
            Self::MissingDescription => "missing-description",
            Self::EmptyDomain => "empty-domain",
            Self::NeedsEnrichment => "needs-enrichment",
            Self::StubRelationship => "stub-relationship",
            Self::CardinalityNormalized => "cardinality-normalized",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of thing a diagnostic's `subject` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Domain,
    Concept,
    Relationship,
    Model,
}

/// A single structured finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: Rule,
    pub message: String,
    pub subject: String,
    pub subject_kind: SubjectKind,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        rule: Rule,
        subject_kind: SubjectKind,
        subject: &str,
        message: String,
    ) -> Self {
        Self {
            severity,
            rule,
            message,
            subject: subject.to_string(),
            subject_kind,
        }
    }

    pub fn error(rule: Rule, subject_kind: SubjectKind, subject: &str, message: String) -> Self {
        Self::new(Severity::Error, rule, subject_kind, subject, message)
    }

    pub fn warning(rule: Rule, subject_kind: SubjectKind, subject: &str, message: String) -> Self {
        Self::new(Severity::Warning, rule, subject_kind, subject, message)
    }

    pub fn info(rule: Rule, subject_kind: SubjectKind, subject: &str, message: String) -> Self {
        Self::new(Severity::Info, rule, subject_kind, subject, message)
    }
}

/// Counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl DiagnosticSummary {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        diagnostics
            .iter()
            .fold(Self::default(), |mut summary, d| {
                match d.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.info += 1,
                }
                summary
            })
    }

    /// A run fails on any error, or on any warning in strict mode.
    pub fn is_failing(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }
}

/// Sort into reporting order: severity, subject, rule, then message.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.subject.cmp(&b.subject))
            .then_with(|| a.rule.as_str().cmp(b.rule.as_str()))
            .then_with(|| a.message.cmp(&b.message))
    });
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}
