//! End-to-end voice flow tests.
//!
//! Drive the whole engine through its public API with scripted speech
//! capabilities: role selection by voice, the chat exchange after it, the
//! dashboard command controller, and the reset path back to role selection.

use agrivoice::speech::{CaptureBackend, CaptureEvent, Synthesizer};
use agrivoice::test_utils::{RecordingSynthesizer, ScriptedCaptureBackend};
use agrivoice::transcript::{Speaker, Transcript, render_emphasis};
use agrivoice::{
    DashboardAction, RoleConfirmation, Role, VoiceConfig, VoiceCoordinator, reply,
    welcome_message,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

fn engine() -> (
    VoiceCoordinator,
    Arc<ScriptedCaptureBackend>,
    Arc<RecordingSynthesizer>,
    mpsc::UnboundedReceiver<RoleConfirmation>,
    mpsc::UnboundedReceiver<DashboardAction>,
) {
    let backend = Arc::new(ScriptedCaptureBackend::new());
    let synth = Arc::new(RecordingSynthesizer::new());
    let (role_tx, role_rx) = mpsc::unbounded_channel();
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let mut config = VoiceConfig::default();
    config.role_agent.confirm_delay_ms = 10;
    let coordinator = VoiceCoordinator::new(
        config,
        Arc::clone(&backend) as Arc<dyn CaptureBackend>,
        Arc::clone(&synth) as Arc<dyn Synthesizer>,
    )
    .with_role_sink(role_tx)
    .with_actions(action_tx);
    (coordinator, backend, synth, role_rx, action_rx)
}

// ────────────────────────────────────────────────────────────────────────────
// Voice journey: role selection → chat → dashboard commands → reset
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn farmer_journey_from_greeting_to_dashboard() {
    let (coordinator, backend, synth, mut role_rx, mut action_rx) = engine();

    // Role selection by voice.
    let role_feed = backend.push_session();
    coordinator.start_role_agent();
    role_feed
        .send(CaptureEvent::Result("hello, I am a farmer".to_owned()))
        .unwrap();
    let confirmation = timeout(Duration::from_secs(1), role_rx.recv())
        .await
        .expect("role confirmed")
        .expect("sink open");
    assert_eq!(confirmation.role, Role::Farmer);
    assert_eq!(coordinator.current_role(), Some(Role::Farmer));

    let spoken = synth.spoken();
    assert!(spoken[0].0.starts_with("Welcome to Agri AI"));
    assert_eq!(
        spoken.last().unwrap().0,
        "You selected Farmer. Taking you to your dashboard."
    );

    // The chat widget greets the new farmer and answers a crop question.
    let mut transcript = Transcript::new();
    transcript.push(Speaker::Bot, welcome_message(Role::Farmer).to_owned());
    transcript.push(Speaker::User, "which crop should I plant?".to_owned());
    let answer = reply(Some(Role::Farmer), "which crop should I plant?");
    assert!(answer.contains("Crop Prediction"));
    transcript.push(Speaker::Bot, answer);
    assert_eq!(transcript.len(), 3);

    // Dashboard voice commands.
    let command_feed = backend.push_session();
    assert!(coordinator.toggle_command_controller());
    command_feed
        .send(CaptureEvent::Result("run crop prediction".to_owned()))
        .unwrap();
    let action = timeout(Duration::from_secs(1), action_rx.recv())
        .await
        .expect("action dispatched")
        .expect("sink open");
    assert_eq!(action, DashboardAction::CropPrediction);

    // "Go back" resets the whole engine to role selection.
    command_feed
        .send(CaptureEvent::Result("go back".to_owned()))
        .unwrap();
    let action = timeout(Duration::from_secs(1), action_rx.recv())
        .await
        .expect("action dispatched")
        .expect("sink open");
    assert_eq!(action, DashboardAction::BackToRoles);
    assert_eq!(coordinator.current_role(), None);

    // A fresh role selection round works after the reset.
    let next_feed = backend.push_session();
    coordinator.start_role_agent();
    next_feed
        .send(CaptureEvent::Result("buyer".to_owned()))
        .unwrap();
    let confirmation = timeout(Duration::from_secs(1), role_rx.recv())
        .await
        .expect("role confirmed")
        .expect("sink open");
    assert_eq!(confirmation.role, Role::Buyer);
}

#[tokio::test]
async fn hindi_command_keywords_reach_the_dashboard() {
    let (coordinator, backend, _synth, _role_rx, mut action_rx) = engine();
    coordinator.select_role(Role::Farmer);

    let feed = backend.push_session();
    assert!(coordinator.toggle_command_controller());
    feed.send(CaptureEvent::Result("उर्वरक".to_owned())).unwrap();
    let action = timeout(Duration::from_secs(1), action_rx.recv())
        .await
        .expect("action dispatched")
        .expect("sink open");
    assert_eq!(action, DashboardAction::Fertilizer);
}

// ────────────────────────────────────────────────────────────────────────────
// Chat and transcript
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn chat_without_role_asks_for_one() {
    let text = reply(None, "which crop should I plant?");
    assert_eq!(text, "Please select your role (Farmer, Seller, or Buyer) first.");
}

#[test]
fn reply_renders_safely_into_the_transcript() {
    let answer = reply(Some(Role::Seller), "how do I add crops? <script>alert(1)</script>");
    let html = render_emphasis(&answer);
    assert!(html.contains("<strong>Seller profile &amp; crop quantity</strong>"));
    assert!(!html.contains("<script>"));

    // User text is escaped too.
    let user = render_emphasis("1 < 2 & \"so on\"");
    assert!(user.contains("&lt;"));
    assert!(user.contains("&amp;"));
}
