use thiserror::Error;

/// Errors surfaced by the chunk reader.
///
/// Every failure is fatal for the call that produced it: no output built for
/// that call is returned, and no retries are attempted internally.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source could not be opened, sought, or read. Session state after
    /// an I/O failure is undefined; callers should close the session.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A growable buffer could not acquire the memory it needed. Any partial
    /// output accumulated by the failing call has been discarded.
    #[error("buffer allocation failed")]
    ResourceExhausted,

    /// A batch was requested from a session that has already been closed.
    #[error("session is closed")]
    ClosedSession,
}
