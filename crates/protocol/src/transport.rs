//! Transport identifiers as they appear in query strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport that carries the connection once the start handshake succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportKind {
	/// HTTP long polling (default, works everywhere)
	#[default]
	LongPolling,
	/// Server-sent events stream
	ServerSentEvents,
	/// Hidden iframe streaming
	ForeverFrame,
	/// WebSocket stream
	WebSockets,
}

impl TransportKind {
	/// Returns the wire name sent in the `transport` query parameter.
	pub fn as_str(self) -> &'static str {
		match self {
			TransportKind::LongPolling => "longPolling",
			TransportKind::ServerSentEvents => "serverSentEvents",
			TransportKind::ForeverFrame => "foreverFrame",
			TransportKind::WebSockets => "webSockets",
		}
	}
}

impl fmt::Display for TransportKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
