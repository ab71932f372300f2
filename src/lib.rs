//! AgriVoice: voice and conversational interaction engine for an
//! agricultural assistant.
//!
//! The engine drives two voice flows over a single shared capture slot:
//! - **Role selection**: a voice agent greets the user, listens for
//!   "farmer", "seller", or "buyer", confirms the match out loud, and
//!   hands the selection to the host after a short delay.
//! - **Dashboard commands**: a toggleable controller maps free-form
//!   utterances (English and Hindi keywords) to dashboard UI actions.
//!
//! # Architecture
//!
//! The host injects its speech capabilities through the
//! [`speech::CaptureBackend`] and [`speech::Synthesizer`] traits; the
//! [`VoiceCoordinator`] owns both agents and routes their output over
//! async channels:
//! - **Intent**: rule-based keyword classifiers for roles and commands
//! - **Chat**: a pure role-aware reply engine for the assistant widget
//! - **Transcript**: chat history with HTML-safe rendering
//! - **Runtime**: broadcast events for listening indicators and notices
//!
//! Everything except the coordinator is synchronous and side-effect free,
//! so the classifiers and the reply engine can be used standalone.

pub mod chat;
pub mod config;
pub mod error;
pub mod intent;
pub mod pipeline;
pub mod runtime;
pub mod speech;
pub mod test_utils;
pub mod transcript;

pub use chat::{reply, welcome_message};
pub use config::VoiceConfig;
pub use error::{Result, VoiceError};
pub use intent::{Command, Role, classify_command, classify_role};
pub use pipeline::coordinator::VoiceCoordinator;
pub use pipeline::messages::RoleConfirmation;
pub use runtime::{AgentKind, DashboardAction, RuntimeEvent};
pub use transcript::{Speaker, Transcript, TranscriptEntry};

/// Initialize tracing for host binaries.
///
/// Respects `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}
