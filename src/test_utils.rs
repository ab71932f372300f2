//! Shared test utilities: scripted speech capabilities.
//!
//! Used by the coordinator unit tests and the integration tests in
//! `tests/` to drive the agents without a microphone or speaker.

use crate::error::{Result, VoiceError};
use crate::speech::{CaptureBackend, CaptureEvent, CaptureOptions, CaptureSession, Synthesizer};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A capture backend that hands out pre-scripted sessions.
///
/// Each call to [`ScriptedCaptureBackend::push_session`] queues one session
/// and returns the sender used to feed it events. `start()` pops queued
/// sessions in order; when the queue is empty it opens a session that stays
/// silent until stopped.
pub struct ScriptedCaptureBackend {
    queued: Mutex<VecDeque<mpsc::UnboundedReceiver<CaptureEvent>>>,
    // Senders for silent sessions, held so their streams stay open.
    silent: Mutex<Vec<mpsc::UnboundedSender<CaptureEvent>>>,
    starts: AtomicUsize,
    available: bool,
}

impl ScriptedCaptureBackend {
    pub fn new() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            silent: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
            available: true,
        }
    }

    /// A backend whose `start()` always fails with `CapabilityUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Queue the next session and return its event feeder.
    pub fn push_session(&self) -> mpsc::UnboundedSender<CaptureEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.queued
            .lock()
            .expect("scripted backend lock")
            .push_back(rx);
        tx
    }

    /// Number of `start()` calls observed so far.
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for ScriptedCaptureBackend {
    fn start(&self, _options: &CaptureOptions) -> Result<CaptureSession> {
        if !self.available {
            return Err(VoiceError::CapabilityUnavailable(
                "speech recognition not supported in this host".to_owned(),
            ));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .queued
            .lock()
            .expect("scripted backend lock")
            .pop_front();
        let rx = match rx {
            Some(rx) => rx,
            None => {
                let (tx, rx) = mpsc::unbounded_channel();
                self.silent.lock().expect("scripted backend lock").push(tx);
                rx
            }
        };
        Ok(CaptureSession::new(rx, CancellationToken::new()))
    }
}

/// A synthesizer that records what it was asked to speak.
#[derive(Default)]
pub struct RecordingSynthesizer {
    spoken: Mutex<Vec<(String, String)>>,
    cancels: AtomicUsize,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(text, language)` pairs spoken so far, in order.
    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().expect("synth lock").clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Synthesizer for RecordingSynthesizer {
    fn speak(&self, text: &str, language: &str) {
        // speak implies cancelling any current utterance.
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.spoken
            .lock()
            .expect("synth lock")
            .push((text.to_owned(), language.to_owned()));
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}
