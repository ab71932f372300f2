//! Host speech capability seams.
//!
//! The engine never talks to a microphone or a speaker directly. The host
//! provides a [`CaptureBackend`] that opens continuous speech-to-text
//! sessions and a [`Synthesizer`] for speech output; both are injected into
//! the coordinator as trait objects. Tests use the scripted implementations
//! in [`crate::test_utils`].

use crate::error::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Event emitted by a live capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A recognized utterance (raw transcript, interim results disabled).
    Result(String),
    /// The session ended on its own. Not an error; the owning agent decides
    /// whether to restart.
    Ended,
    /// A single recognition attempt failed without ending the session.
    /// Recovered locally by waiting for the next event.
    Error(String),
}

/// Options for opening a capture session.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Keep recognizing until explicitly stopped.
    pub continuous: bool,
    /// BCP-47 language tag, e.g. `en-IN`.
    pub language: String,
}

/// A live speech-to-text session handle.
///
/// Events arrive in recognition order. Stopping is synchronous from the
/// caller's perspective; events that arrive after [`CaptureSession::stop`]
/// are simply never read because the owning agent has left its loop.
pub struct CaptureSession {
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    cancel: CancellationToken,
}

impl CaptureSession {
    pub fn new(events: mpsc::UnboundedReceiver<CaptureEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Await the next session event. `None` once the backend closes the
    /// stream; treated like [`CaptureEvent::Ended`] by the agents.
    pub async fn next_event(&mut self) -> Option<CaptureEvent> {
        self.events.recv().await
    }

    /// Stop the session. Idempotent; late events are discarded unread.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Continuous speech-to-text capability provided by the host.
pub trait CaptureBackend: Send + Sync {
    /// Open a new capture session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VoiceError::CapabilityUnavailable`] when speech
    /// recognition is not supported on this host; the caller surfaces a
    /// one-time notice and does not retry.
    fn start(&self, options: &CaptureOptions) -> Result<CaptureSession>;
}

/// Speech output capability provided by the host.
///
/// Best-effort: a host without text-to-speech implements both methods as
/// no-ops, matching the engine's no-fatal-error policy.
pub trait Synthesizer: Send + Sync {
    /// Speak an utterance in the given BCP-47 language.
    ///
    /// Implementations must cancel any utterance currently being spoken:
    /// at most one output utterance is active system-wide.
    fn speak(&self, text: &str, language: &str);

    /// Cancel the current utterance, if any.
    fn cancel(&self);
}
