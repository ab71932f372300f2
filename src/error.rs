//! Error types for the voice interaction engine.

/// Top-level error type for the voice front end.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Speech capture or synthesis is not available on this host.
    ///
    /// Surfaced once as a user-visible notice; never retried.
    #[error("speech capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Speech capture session error.
    #[error("capture error: {0}")]
    Capture(String),

    /// Speech synthesis error.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, VoiceError>;
