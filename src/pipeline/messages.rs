//! Message types passed between the voice agents and the host.

use crate::intent::Role;

/// A confirmed role selection, delivered to the host's role-change sink.
///
/// Carries the raw utterance that produced the match so the host can
/// persist it alongside the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfirmation {
    /// The detected role.
    pub role: Role,
    /// Raw transcript of the utterance that named the role.
    pub source_utterance: String,
}
