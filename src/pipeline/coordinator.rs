//! Coordinator that owns the two voice agents and the shared capture slot.
//!
//! Only one capture session may be live system-wide: the role-selection
//! agent holds it before a role exists, the dashboard command controller
//! after. The coordinator enforces this by tearing one agent down before
//! activating the other, and routes agent output to the host through
//! channels (role-change sink, dashboard actions, runtime events).

use crate::config::{RoleAgentConfig, VoiceConfig};
use crate::error::VoiceError;
use crate::intent::{self, Command, Role};
use crate::pipeline::messages::RoleConfirmation;
use crate::runtime::{AgentKind, DashboardAction, RuntimeEvent};
use crate::speech::{CaptureBackend, CaptureEvent, CaptureOptions, CaptureSession, Synthesizer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Buffer size for the runtime event broadcast.
const RUNTIME_CHANNEL_SIZE: usize = 64;

/// Handle to a spawned agent task.
///
/// The task itself is detached; stopping is signalled through the token
/// and observed through the shared active flag.
struct AgentHandle {
    cancel: CancellationToken,
    active: Arc<AtomicBool>,
}

impl AgentHandle {
    fn stop(&self) {
        // Synchronous from the caller's perspective: the flag flips here,
        // the task observes the token and discards any late events.
        self.cancel.cancel();
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Coordinates the role-selection voice agent, the dashboard command
/// controller, and the chat-facing role state.
pub struct VoiceCoordinator {
    config: VoiceConfig,
    backend: Arc<dyn CaptureBackend>,
    synth: Arc<dyn Synthesizer>,
    runtime_tx: broadcast::Sender<RuntimeEvent>,
    role_tx: Option<mpsc::UnboundedSender<RoleConfirmation>>,
    action_tx: Option<mpsc::UnboundedSender<DashboardAction>>,
    role: Arc<Mutex<Option<Role>>>,
    role_agent: Mutex<Option<AgentHandle>>,
    controller: Mutex<Option<AgentHandle>>,
    capability_notice_sent: AtomicBool,
}

impl VoiceCoordinator {
    /// Create a coordinator over the host's speech capabilities.
    pub fn new(
        config: VoiceConfig,
        backend: Arc<dyn CaptureBackend>,
        synth: Arc<dyn Synthesizer>,
    ) -> Self {
        let (runtime_tx, _) = broadcast::channel(RUNTIME_CHANNEL_SIZE);
        Self {
            config,
            backend,
            synth,
            runtime_tx,
            role_tx: None,
            action_tx: None,
            role: Arc::new(Mutex::new(None)),
            role_agent: Mutex::new(None),
            controller: Mutex::new(None),
            capability_notice_sent: AtomicBool::new(false),
        }
    }

    /// Attach the role-change sink. Receives `(role, raw utterance)` after
    /// the confirmation delay so the host can persist the choice and
    /// switch screens.
    pub fn with_role_sink(mut self, tx: mpsc::UnboundedSender<RoleConfirmation>) -> Self {
        self.role_tx = Some(tx);
        self
    }

    /// Attach the UI action dispatcher for dashboard voice commands.
    pub fn with_actions(mut self, tx: mpsc::UnboundedSender<DashboardAction>) -> Self {
        self.action_tx = Some(tx);
        self
    }

    /// Subscribe to runtime events (listening indicators, heard text,
    /// notices).
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.runtime_tx.subscribe()
    }

    /// The currently confirmed role, if any.
    pub fn current_role(&self) -> Option<Role> {
        *self.role.lock().expect("role lock")
    }

    /// Confirm a role through a non-voice path (e.g. the user clicked a
    /// role card). Tears down the role agent; the host handles navigation
    /// itself on this path.
    pub fn select_role(&self, role: Role) {
        *self.role.lock().expect("role lock") = Some(role);
        self.stop_role_agent();
        info!("role selected manually: {role}");
    }

    /// Clear the role and tear down both agents: the explicit
    /// return-to-role-selection reset path.
    pub fn clear_role(&self) {
        if let Some(handle) = self.controller.lock().expect("controller lock").take() {
            handle.stop();
        }
        self.stop_role_agent();
        *self.role.lock().expect("role lock") = None;
    }

    /// Start the role-selection voice agent.
    ///
    /// No-op when a role is already confirmed or the agent is already
    /// listening. When speech recognition is unavailable the agent stays
    /// idle and a one-time [`RuntimeEvent::Notice`] is emitted instead.
    pub fn start_role_agent(&self) {
        if self.current_role().is_some() || self.is_role_agent_active() {
            return;
        }

        // Single capture slot: the controller cannot be live without a
        // role, but guard against it anyway. Never hold both agent locks
        // at once.
        if let Some(handle) = self.controller.lock().expect("controller lock").take() {
            handle.stop();
        }

        let options = CaptureOptions {
            continuous: true,
            language: self.config.role_agent.language.clone(),
        };
        let session = match self.backend.start(&options) {
            Ok(session) => session,
            Err(e) => {
                self.notify_capability_once(&e);
                return;
            }
        };

        let cancel = CancellationToken::new();
        let active = Arc::new(AtomicBool::new(true));
        let ctl = RoleAgentControl {
            backend: Arc::clone(&self.backend),
            synth: Arc::clone(&self.synth),
            runtime_tx: self.runtime_tx.clone(),
            role_tx: self.role_tx.clone(),
            role: Arc::clone(&self.role),
            active: Arc::clone(&active),
            cancel: cancel.clone(),
            options,
        };
        let config = self.config.role_agent.clone();
        tokio::spawn(run_role_agent(config, session, ctl));
        *self.role_agent.lock().expect("role agent lock") = Some(AgentHandle { cancel, active });
    }

    /// Stop the role-selection voice agent. Idempotent: stopping an idle
    /// or already-stopped agent is a no-op.
    pub fn stop_role_agent(&self) {
        if let Some(handle) = self.role_agent.lock().expect("role agent lock").take() {
            handle.stop();
        }
    }

    /// Whether the role agent is currently listening.
    pub fn is_role_agent_active(&self) -> bool {
        self.role_agent
            .lock()
            .expect("role agent lock")
            .as_ref()
            .is_some_and(|h| h.active.load(Ordering::SeqCst))
    }

    /// Toggle the dashboard command controller and return the new state
    /// (`true` = on).
    ///
    /// Turning on requires a confirmed role and tears down any live role
    /// agent first. Turning off stops capture immediately.
    pub fn toggle_command_controller(&self) -> bool {
        {
            let mut guard = self.controller.lock().expect("controller lock");
            if let Some(handle) = guard.take() {
                if handle.active.load(Ordering::SeqCst) {
                    handle.stop();
                    return false;
                }
                // Stale handle left by a back-navigation shutdown; fall
                // through and treat this toggle as turning on.
            }
        }

        if self.current_role().is_none() {
            let _ = self.runtime_tx.send(RuntimeEvent::Notice {
                text: "Select a role before enabling voice commands.".to_owned(),
            });
            return false;
        }

        // Single capture slot.
        self.stop_role_agent();

        let options = CaptureOptions {
            continuous: true,
            language: self.config.language.bcp47().to_owned(),
        };
        let session = match self.backend.start(&options) {
            Ok(session) => session,
            Err(e) => {
                self.notify_capability_once(&e);
                return false;
            }
        };

        let cancel = CancellationToken::new();
        let active = Arc::new(AtomicBool::new(true));
        let ctl = CommandControllerControl {
            runtime_tx: self.runtime_tx.clone(),
            action_tx: self.action_tx.clone(),
            role: Arc::clone(&self.role),
            active: Arc::clone(&active),
            cancel: cancel.clone(),
        };
        tokio::spawn(run_command_controller(session, ctl));
        *self.controller.lock().expect("controller lock") = Some(AgentHandle { cancel, active });
        true
    }

    /// Whether the dashboard command controller is on.
    pub fn is_command_controller_active(&self) -> bool {
        self.controller
            .lock()
            .expect("controller lock")
            .as_ref()
            .is_some_and(|h| h.active.load(Ordering::SeqCst))
    }

    fn notify_capability_once(&self, error: &VoiceError) {
        warn!("speech capability check failed: {error}");
        if !self.capability_notice_sent.swap(true, Ordering::SeqCst) {
            let _ = self.runtime_tx.send(RuntimeEvent::Notice {
                text: error.to_string(),
            });
        }
    }
}

impl Drop for VoiceCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.controller.lock().expect("controller lock").take() {
            handle.stop();
        }
        if let Some(handle) = self.role_agent.lock().expect("role agent lock").take() {
            handle.stop();
        }
    }
}

/// Bundled control state for the role-selection agent task.
struct RoleAgentControl {
    backend: Arc<dyn CaptureBackend>,
    synth: Arc<dyn Synthesizer>,
    runtime_tx: broadcast::Sender<RuntimeEvent>,
    role_tx: Option<mpsc::UnboundedSender<RoleConfirmation>>,
    role: Arc<Mutex<Option<Role>>>,
    active: Arc<AtomicBool>,
    cancel: CancellationToken,
    options: CaptureOptions,
}

/// Role-selection agent loop: `Listening → {RoleConfirmed, Stopped}`.
///
/// Keeps the continuous-listening illusion by restarting the capture
/// session whenever it ends on its own, guarded so no restart happens once
/// a role is confirmed or the agent is stopped.
async fn run_role_agent(
    config: RoleAgentConfig,
    mut session: CaptureSession,
    ctl: RoleAgentControl,
) {
    // Speaking the prompt cancels any in-flight utterance (at most one
    // output utterance system-wide).
    ctl.synth.speak(&config.welcome_prompt, &config.language);
    let _ = ctl.runtime_tx.send(RuntimeEvent::ListeningIndicator {
        agent: AgentKind::RoleSelection,
        active: true,
    });
    info!("role agent listening");

    let confirmed = loop {
        tokio::select! {
            // Check cancellation first so a stop that has already been
            // signalled always wins over a queued session event.
            biased;
            () = ctl.cancel.cancelled() => break None,
            ev = session.next_event() => match ev {
                Some(CaptureEvent::Result(utterance)) => {
                    if let Some(role) = intent::classify_role(&utterance) {
                        break Some((role, utterance));
                    }
                    // No role named; keep listening.
                }
                Some(CaptureEvent::Error(e)) => {
                    // Transient recognition error: the session is still
                    // live, keep the indicator on and wait.
                    warn!("recognition error (transient): {e}");
                }
                Some(CaptureEvent::Ended) | None => {
                    match ctl.backend.start(&ctl.options) {
                        Ok(next) => {
                            session = next;
                            info!("capture session restarted");
                        }
                        Err(e) => {
                            warn!("capture restart failed: {e}");
                            let _ = ctl.runtime_tx.send(RuntimeEvent::Notice {
                                text: e.to_string(),
                            });
                            break None;
                        }
                    }
                }
            }
        }
    };

    session.stop();
    let _ = ctl.runtime_tx.send(RuntimeEvent::ListeningIndicator {
        agent: AgentKind::RoleSelection,
        active: false,
    });
    ctl.active.store(false, Ordering::SeqCst);

    let Some((role, utterance)) = confirmed else {
        info!("role agent stopped");
        return;
    };

    info!("role confirmed by voice: {role}");
    ctl.synth.speak(
        &format!("You selected {role}. Taking you to your dashboard."),
        &config.language,
    );
    *ctl.role.lock().expect("role lock") = Some(role);
    let _ = ctl.runtime_tx.send(RuntimeEvent::RoleConfirmed { role });

    // Let the confirmation be heard before the host switches screens.
    // Delivery is not cancellable once a role is confirmed.
    tokio::time::sleep(Duration::from_millis(config.confirm_delay_ms)).await;
    if let Some(tx) = &ctl.role_tx {
        let _ = tx.send(RoleConfirmation {
            role,
            source_utterance: utterance,
        });
    }
}

/// Bundled control state for the dashboard command controller task.
struct CommandControllerControl {
    runtime_tx: broadcast::Sender<RuntimeEvent>,
    action_tx: Option<mpsc::UnboundedSender<DashboardAction>>,
    role: Arc<Mutex<Option<Role>>>,
    active: Arc<AtomicBool>,
    cancel: CancellationToken,
}

/// Dashboard command controller loop.
///
/// Each utterance updates the "last heard" display; a classified command
/// dispatches exactly one UI action. A session that ends on its own is
/// tolerated passively — the indicator reports the lapse, the controller
/// stays on until toggled off. Back-navigation clears the role and turns
/// the controller off before returning.
async fn run_command_controller(session: CaptureSession, ctl: CommandControllerControl) {
    let _ = ctl.runtime_tx.send(RuntimeEvent::ListeningIndicator {
        agent: AgentKind::Dashboard,
        active: true,
    });
    info!("voice commands on");

    let mut session = Some(session);
    loop {
        let event_fut = async {
            match &mut session {
                Some(s) => s.next_event().await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            () = ctl.cancel.cancelled() => break,
            ev = event_fut => match ev {
                Some(CaptureEvent::Result(text)) => {
                    let _ = ctl.runtime_tx.send(RuntimeEvent::Heard { text: text.clone() });
                    let Some(command) = intent::classify_command(&text) else {
                        // Unmatched utterances only update the display.
                        continue;
                    };
                    let _ = ctl.runtime_tx.send(RuntimeEvent::CommandDetected { command });
                    info!("voice command: {command:?}");
                    if command == Command::NavigateBack {
                        *ctl.role.lock().expect("role lock") = None;
                        if let Some(tx) = &ctl.action_tx {
                            let _ = tx.send(DashboardAction::BackToRoles);
                        }
                        break;
                    }
                    if let Some(tx) = &ctl.action_tx {
                        let _ = tx.send(DashboardAction::from_command(command));
                    }
                }
                Some(CaptureEvent::Error(e)) => {
                    warn!("recognition error (transient): {e}");
                }
                Some(CaptureEvent::Ended) | None => {
                    // No auto-restart here: the indicator, not a restart
                    // loop, communicates the lapsed session.
                    if let Some(s) = session.take() {
                        s.stop();
                    }
                    let _ = ctl.runtime_tx.send(RuntimeEvent::ListeningIndicator {
                        agent: AgentKind::Dashboard,
                        active: false,
                    });
                    info!("capture session ended; voice commands stay on");
                }
            }
        }
    }

    if let Some(s) = session.take() {
        s.stop();
    }
    let _ = ctl.runtime_tx.send(RuntimeEvent::ListeningIndicator {
        agent: AgentKind::Dashboard,
        active: false,
    });
    ctl.active.store(false, Ordering::SeqCst);
    info!("voice commands off");
}
