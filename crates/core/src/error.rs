use crate::model::EntityKind;

/// Fatal engine errors.
///
/// Rule violations in the conceptual graph are never errors; they are
/// reported as [`Diagnostic`](crate::diagnostic::Diagnostic) values. Only
/// conditions with no well-defined key to diagnose against end up here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Record without a name: {kind} at position {position}")]
    MissingName { kind: EntityKind, position: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
