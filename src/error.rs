use thiserror::Error;

/// Library-level errors using thiserror for structured error handling.
///
/// Validation failures reject the offending call before it touches the
/// queue; player errors only surface when constructing a device-backed
/// player. Clip-level playback failures are not errors at all: they are
/// terminal outcomes (see `player::PlayOutcome`) and never abort a sequence.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Invalid queue number: {0} (expected one uppercase letter followed by four digits)")]
    InvalidQueueNumber(String),

    #[error("Invalid window number: {0} (expected a single decimal digit)")]
    InvalidWindowNumber(String),
}

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
