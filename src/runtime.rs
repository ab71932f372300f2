//! Runtime events emitted by the voice engine for UI and observability.
//!
//! Intentionally lightweight so the agents can emit events without
//! blocking their capture loops. Delivered over a `tokio::sync::broadcast`
//! channel; dropped silently when no UI is attached.

use crate::intent::{Command, Role};

/// Which voice agent an indicator event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// The role-selection voice agent.
    RoleSelection,
    /// The dashboard command controller.
    Dashboard,
}

/// Events that describe what the voice engine is doing "right now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Show or hide the "listening" indicator for an agent.
    ///
    /// For the dashboard controller this also reports a lapsed capture
    /// session (`active: false` while the controller stays on).
    ListeningIndicator { agent: AgentKind, active: bool },
    /// Raw text of the latest dashboard utterance, for the status display.
    Heard { text: String },
    /// A dashboard command was recognized.
    CommandDetected { command: Command },
    /// A role was confirmed by voice.
    RoleConfirmed { role: Role },
    /// One-time user-visible notice (e.g. speech recognition unavailable).
    Notice { text: String },
}

/// UI actions the dashboard command controller dispatches to the host.
///
/// Each recognized command invokes exactly one action; the host wires these
/// to its buttons and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    /// Move forward in the dashboard flow (reserved; the current dashboard
    /// has no forward step, mirroring the host UI).
    NavigateNext,
    /// Return to the role selection screen.
    BackToRoles,
    /// Run crop prediction with the current form inputs.
    CropPrediction,
    /// Run the fertilizer recommendation.
    Fertilizer,
    /// Load the cultivation guide.
    CultivationGuide,
    /// Focus the language selector control.
    FocusLanguage,
    /// Read the loaded procedure steps aloud.
    ReadAloud,
}

impl DashboardAction {
    /// Map a classified command to its UI action.
    pub fn from_command(command: Command) -> Self {
        match command {
            Command::NavigateNext => DashboardAction::NavigateNext,
            Command::NavigateBack => DashboardAction::BackToRoles,
            Command::CropPrediction => DashboardAction::CropPrediction,
            Command::Fertilizer => DashboardAction::Fertilizer,
            Command::CultivationGuide => DashboardAction::CultivationGuide,
            Command::FocusLanguage => DashboardAction::FocusLanguage,
            Command::ReadAloud => DashboardAction::ReadAloud,
        }
    }
}
