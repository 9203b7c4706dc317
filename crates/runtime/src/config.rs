//! Connection configuration.
//!
//! Loaded from JSON (camelCase keys) with every field optional:
//!
//! ```text
//! { "transportConnectTimeoutMs": 5000, "protocolVersion": "1.4", "transport": "webSockets" }
//! ```

use std::path::Path;
use std::time::Duration;

use hubwire_protocol::{DEFAULT_PROTOCOL_VERSION, TransportKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default window for a transport to finish its start handshake.
pub const DEFAULT_TRANSPORT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Settings shared by every handshake attempt on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionConfig {
	/// Total time a transport may take to connect and be acknowledged.
	pub transport_connect_timeout_ms: u64,
	/// Client protocol version sent as `clientProtocol`.
	pub protocol_version: String,
	/// Transport to start.
	pub transport: TransportKind,
}

impl Default for ConnectionConfig {
	fn default() -> Self {
		Self {
			transport_connect_timeout_ms: DEFAULT_TRANSPORT_CONNECT_TIMEOUT_MS,
			protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
			transport: TransportKind::default(),
		}
	}
}

impl ConnectionConfig {
	/// The handshake deadline.
	pub fn total_transport_connect_timeout(&self) -> Duration {
		Duration::from_millis(self.transport_connect_timeout_ms)
	}

	/// Loads a config from a JSON file. Missing keys take their defaults.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}
}
