//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use conceptual_core::{
    build_state, ConceptRecord, DomainRecord, Governance, RelationshipRecord, SourceRecords,
    State,
};

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conceptual_core=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn domain(name: &str) -> DomainRecord {
    DomainRecord {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn domain_with(name: &str, governance: Governance) -> DomainRecord {
    DomainRecord {
        governance,
        ..domain(name)
    }
}

pub fn concept(name: &str, domain: Option<&str>) -> ConceptRecord {
    ConceptRecord {
        name: name.to_string(),
        domain: domain.map(str::to_string),
        ..Default::default()
    }
}

pub fn described(name: &str, domain: &str, description: &str) -> ConceptRecord {
    ConceptRecord {
        description: Some(description.to_string()),
        ..concept(name, Some(domain))
    }
}

pub fn relationship(from: &str, verb: &str, to: &str) -> RelationshipRecord {
    RelationshipRecord {
        verb: Some(verb.to_string()),
        from: from.to_string(),
        to: to.to_string(),
        ..Default::default()
    }
}

/// Build a state that is expected to have no fatal problems.
pub fn build(records: SourceRecords) -> State {
    build_state(records).expect("fixture records are named").state
}

/// A small but complete project: two domains, a handful of concepts and
/// relationships between them.
pub fn sample_records() -> SourceRecords {
    SourceRecords {
        domains: vec![
            domain_with(
                "party",
                Governance {
                    owner: Some("party-team".into()),
                    confidentiality: Some("internal".into()),
                    ..Default::default()
                },
            ),
            domain("finance"),
        ],
        concepts: vec![
            described("customer", "party", "A person or company that buys"),
            ConceptRecord {
                governance: Governance {
                    confidentiality: Some("confidential".into()),
                    ..Default::default()
                },
                ..described("customer_pii", "party", "Personal data of a customer")
            },
            described("invoice", "finance", "A bill sent to a customer"),
            concept("lead", None),
        ],
        relationships: vec![
            relationship("customer", "receives", "invoice"),
            relationship("lead", "becomes", "customer"),
        ],
    }
}
