//! Generation gateway error types.

/// Specific error conditions for generation-service calls.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GatewayErrorKind {
    /// WebSocket connection could not be established
    #[display("Failed to connect to generation service: {}", _0)]
    Connect(String),
    /// Request frame could not be sent
    #[display("Failed to send request: {}", _0)]
    Send(String),
    /// Transport failure while reading the response stream
    #[display("Failed to receive response: {}", _0)]
    Receive(String),
    /// Server sent a frame the protocol does not allow
    #[display("Protocol violation: {}", _0)]
    Protocol(String),
    /// Connection closed cleanly without delivering a result
    #[display("Service closed the stream without a result")]
    NoContent,
    /// Service answered with an error result
    #[display("Service refused the request: {}", _0)]
    Refused(String),
    /// All attempts failed
    #[display("Retries exhausted after {} attempts", attempts)]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
    },
}

impl GatewayErrorKind {
    /// Whether a failed attempt with this kind should be retried.
    ///
    /// Transport failures are transient. A clean close without a result
    /// and an explicit service refusal are answers, not infrastructure
    /// faults, so they fail the call immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorKind::Connect(_)
                | GatewayErrorKind::Send(_)
                | GatewayErrorKind::Receive(_)
        )
    }
}

/// Error type for generation-gateway operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::NoContent);
/// assert!(!err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The specific error condition
    pub kind: GatewayErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
