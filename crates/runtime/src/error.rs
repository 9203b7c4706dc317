//! Error types for the hubwire runtime.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the hubwire runtime.
#[derive(Debug, Error)]
pub enum Error {
	/// Transport-level failure (connection refused, reset, body read error).
	#[error("Transport error: {0}")]
	Transport(String),

	/// Server answered with a non-success status.
	#[error("HTTP {status} from {url}")]
	Http { status: u16, url: String },

	/// Connection URL could not be used to build a request.
	#[error("Invalid URL '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },

	/// No Tokio runtime available to run timers and deferred completions.
	#[error("No Tokio runtime available: handshakes must be started inside a runtime")]
	NoRuntime,

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The transport start handshake failed.
	#[error(transparent)]
	Handshake(#[from] HandshakeError),
}

/// Discriminant of a [`HandshakeError`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCause {
	/// The caller reported the transport failed.
	ExplicitFailure,
	/// The server answered the start request without acknowledging it.
	StartRejected,
	/// The start request itself could not be completed.
	StartRequestError,
	/// No outcome within the configured connect window.
	Timeout,
	/// The owning connection was torn down while the handshake was pending.
	ExternalDisconnect,
}

impl FailureCause {
	/// Stable snake_case name, used in logs and CLI output.
	pub fn as_str(self) -> &'static str {
		match self {
			FailureCause::ExplicitFailure => "explicit_failure",
			FailureCause::StartRejected => "start_rejected",
			FailureCause::StartRequestError => "start_request_error",
			FailureCause::Timeout => "timeout",
			FailureCause::ExternalDisconnect => "external_disconnect",
		}
	}
}

impl std::fmt::Display for FailureCause {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why a transport start handshake failed.
///
/// Cloneable so every observer awaiting the outcome receives the same value.
/// Underlying errors are shared behind an [`Arc`] and reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Clone, Error)]
pub enum HandshakeError {
	/// The transport reported that it failed to connect.
	#[error("Transport failed to connect")]
	ExplicitFailure(#[source] Option<Arc<Error>>),

	/// The start endpoint answered with something other than `started`.
	#[error("Server rejected transport start: {detail}")]
	StartRejected { detail: String },

	/// The start request failed before a body could be inspected.
	#[error("Error during start request")]
	StartRequestError(#[source] Arc<Error>),

	/// The handshake did not resolve within the connect window.
	#[error("Transport timed out trying to connect after {}ms", .0.as_millis())]
	Timeout(Duration),

	/// The connection's disconnect signal tripped while waiting.
	#[error("Connection was stopped before the transport started")]
	ExternalDisconnect,
}

impl HandshakeError {
	/// Returns the fieldless cause of this failure.
	pub fn cause(&self) -> FailureCause {
		match self {
			HandshakeError::ExplicitFailure(_) => FailureCause::ExplicitFailure,
			HandshakeError::StartRejected { .. } => FailureCause::StartRejected,
			HandshakeError::StartRequestError(_) => FailureCause::StartRequestError,
			HandshakeError::Timeout(_) => FailureCause::Timeout,
			HandshakeError::ExternalDisconnect => FailureCause::ExternalDisconnect,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as _;

	use super::*;

	#[test]
	fn start_request_error_exposes_source() {
		let err = HandshakeError::StartRequestError(Arc::new(Error::Http {
			status: 503,
			url: "http://localhost/start".to_string(),
		}));
		assert_eq!(err.cause(), FailureCause::StartRequestError);
		let source = err.source().expect("source should be set");
		assert_eq!(source.to_string(), "HTTP 503 from http://localhost/start");
	}

	#[test]
	fn explicit_failure_source_is_optional() {
		assert!(HandshakeError::ExplicitFailure(None).source().is_none());
		let with_cause =
			HandshakeError::ExplicitFailure(Some(Arc::new(Error::Transport("reset".into()))));
		assert!(with_cause.source().is_some());
	}

	#[test]
	fn timeout_message_mentions_window() {
		let err = HandshakeError::Timeout(Duration::from_millis(50));
		assert_eq!(err.to_string(), "Transport timed out trying to connect after 50ms");
		assert!(matches!(Error::from(err), Error::Handshake(HandshakeError::Timeout(_))));
	}
}
