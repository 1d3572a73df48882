use std::fmt;

/// Failure of a backend call, as seen by the state machine.
///
/// The engine maps its transport errors into this so the core never touches
/// an I/O error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Server { status }, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "request timed out")
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered with an error status.
    Server { status: u16 },
    /// No response was received.
    Network,
    /// The client-side deadline expired.
    Timeout,
    /// The request could not be built locally (bad base URL, unreadable file).
    Request,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Server { status } => write!(f, "server error {status}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Request => write!(f, "invalid request"),
        }
    }
}
