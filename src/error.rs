//! Error types for the chat action layer.

/// Top-level error type for chat action scheduling.
///
/// Transport failures while emitting a chat action never surface here; the
/// controller logs them and stops the affected schedule.
#[derive(Debug, thiserror::Error)]
pub enum ChatActionError {
    /// The turn context was used before the chat action layer was installed.
    #[error("chat action layer is not installed on this context")]
    NotInstalled,

    /// A string did not name a known chat action.
    #[error("unknown chat action: {0}")]
    UnknownChatAction(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ChatActionError>;
