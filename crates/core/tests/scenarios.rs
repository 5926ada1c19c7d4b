//! End-to-end scenarios across builder, sync, validator and diff.

mod common;

use assert_matches::assert_matches;
use common::{build, concept, described, domain, init_tracing, relationship, sample_records};
use conceptual_core::{
    build_state, diff_states, run, sync_models, validate, CandidateModel, ChangeKind, CoreError,
    EngineConfig, EntityKind, Layer, Rule, Severity, SourceRecords, Status, SyncConfig,
    ValidationConfig,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Governance inheritance
// ---------------------------------------------------------------------------

#[test]
fn test_confidentiality_inherits_unless_overridden() {
    init_tracing();
    let state = build(sample_records());

    let customer = state.concept("customer").unwrap();
    assert_eq!(
        customer.governance.confidentiality.as_deref(),
        Some("internal")
    );

    let pii = state.concept("customer_pii").unwrap();
    assert_eq!(
        pii.governance.confidentiality.as_deref(),
        Some("confidential")
    );
    assert_eq!(pii.owner(), Some("party-team"));

    let invoice = state.concept("invoice").unwrap();
    assert_eq!(invoice.owner(), None);
}

// ---------------------------------------------------------------------------
// Diff scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_new_concept_is_added() {
    let before = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: vec![concept("customer", Some("party"))],
        relationships: vec![],
    });
    let after = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: vec![concept("customer", Some("party")), concept("refund", Some("party"))],
        relationships: vec![],
    });

    let diff = diff_states(&before, &after);
    assert!(diff.iter().any(|e| e.kind == ChangeKind::Added
        && e.entity_kind == EntityKind::Concept
        && e.name == "refund"));
}

#[test]
fn test_changed_description_is_modified() {
    let before = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: vec![described("customer", "party", "Someone who buys")],
        relationships: vec![],
    });
    let after = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: vec![described("customer", "party", "Someone who pays")],
        relationships: vec![],
    });

    let diff = diff_states(&before, &after);
    assert_eq!(diff.len(), 1);
    let entry = &diff[0];
    assert_eq!(entry.kind, ChangeKind::Modified);
    assert_eq!(entry.name, "customer");
    assert_eq!(entry.field_names(), vec!["description"]);
    assert_eq!(entry.changed_fields[0].old, json!("Someone who buys"));
    assert_eq!(entry.changed_fields[0].new, json!("Someone who pays"));
}

#[test]
fn test_new_relationship_is_added() {
    let concepts = vec![
        concept("customer", Some("party")),
        concept("refund", Some("party")),
    ];
    let before = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: concepts.clone(),
        relationships: vec![],
    });
    let after = build(SourceRecords {
        domains: vec![domain("party")],
        concepts,
        relationships: vec![relationship("customer", "requests", "refund")],
    });

    let diff = diff_states(&before, &after);
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].kind, ChangeKind::Added);
    assert_eq!(diff[0].entity_kind, EntityKind::Relationship);
    assert_eq!(diff[0].name, "customer:requests:refund");
}

#[test]
fn test_sync_status_change_shows_in_diff() {
    let state = build(sample_records());
    let synced = sync_models(
        &state,
        &[CandidateModel::tagged("dim_customer", Layer::Gold, "customer")],
        &SyncConfig::default(),
    )
    .state;

    let diff = diff_states(&state, &synced);
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].name, "customer");
    assert_eq!(diff[0].field_names(), vec!["status"]);
    assert_eq!(diff[0].changed_fields[0].old, json!("draft"));
    assert_eq!(diff[0].changed_fields[0].new, json!("complete"));
}

// ---------------------------------------------------------------------------
// Validation scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_dangling_domain_yields_exactly_one_error() {
    let state = build(SourceRecords {
        domains: vec![domain("party")],
        concepts: vec![concept("refund", Some("finance"))],
        relationships: vec![],
    });
    let diagnostics = validate(&state, &ValidationConfig::default());
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, Rule::DanglingDomain);
    assert_eq!(errors[0].subject, "refund");
}

#[test]
fn test_pipeline_reports_everything_in_order() {
    init_tracing();
    let models = vec![
        CandidateModel::tagged("dim_customer", Layer::Gold, "customer"),
        CandidateModel::tagged("fct_invoices", Layer::Silver, "invoice"),
        CandidateModel::tagged("fct_refunds", Layer::Gold, "refund"),
        CandidateModel::untagged("dim_date", Layer::Gold),
    ];
    let report = run(sample_records(), &models, &EngineConfig::default()).unwrap();

    let state = &report.state;
    assert_eq!(state.concept("customer").unwrap().status, Status::Complete);
    assert_eq!(state.concept("invoice").unwrap().status, Status::Complete);
    assert_eq!(state.concept("customer_pii").unwrap().status, Status::Draft);
    assert_eq!(state.concept("lead").unwrap().status, Status::Stub);

    let found: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| (d.severity, d.rule, d.subject.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (Severity::Warning, Rule::UnimplementedConcept, "customer_pii"),
            (Severity::Warning, Rule::OrphanModel, "dim_date"),
            (Severity::Warning, Rule::UnknownConcept, "fct_refunds"),
            (Severity::Warning, Rule::StubConcept, "lead"),
            (Severity::Warning, Rule::UnimplementedConcept, "lead"),
            (
                Severity::Info,
                Rule::UnrealizedRelationship,
                "customer:receives:invoice"
            ),
            (Severity::Info, Rule::NeedsEnrichment, "lead"),
            (Severity::Info, Rule::StubRelationship, "lead:becomes:customer"),
        ]
    );
    assert!(!report.has_errors());
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_no_drafts_fails_the_run_on_unfinished_work() {
    let mut config = EngineConfig::default();
    config.validation.no_drafts = true;
    let models = [
        CandidateModel::tagged("dim_customer", Layer::Gold, "customer"),
        CandidateModel::tagged("fct_invoices", Layer::Silver, "invoice"),
    ];
    let report = run(sample_records(), &models, &config).unwrap();

    let errors: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| (d.rule, d.subject.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (Rule::NeedsEnrichment, "lead"),
            (Rule::StubRelationship, "lead:becomes:customer"),
        ]
    );
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_unnamed_concept_aborts_construction() {
    let mut records = sample_records();
    records.concepts.push(concept("", Some("party")));
    assert_matches!(
        build_state(records),
        Err(CoreError::MissingName {
            kind: EntityKind::Concept,
            position: 4
        })
    );
}
