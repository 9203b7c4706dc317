//! Collaborator interfaces the handshake depends on.
//!
//! The handshake never performs I/O itself. It reads connection settings and
//! the disconnect signal through [`ConnectionLike`] and issues the start
//! request through [`HttpClient`]. Both are object safe so transports can
//! share one `Arc<dyn ...>` across attempts.

use std::time::Duration;

use futures_util::future::BoxFuture;
use hubwire_protocol::{StartQuery, TransportKind};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::ConnectionConfig;
use crate::error::Result;

/// Trait defining what a handshake needs from its owning connection.
pub trait ConnectionLike: Send + Sync {
	/// Base URL of the endpoint, e.g. `http://host/signalr/`.
	fn url(&self) -> &str;

	/// Opaque token issued when the connection was negotiated.
	fn connection_token(&self) -> &str;

	/// Client protocol version sent with the start request.
	fn protocol_version(&self) -> &str;

	/// Window in which a transport must connect and be acknowledged.
	fn total_transport_connect_timeout(&self) -> Duration;

	/// Signal tripped when the connection is being torn down.
	///
	/// Handshakes observe this token but never cancel it.
	fn disconnect_token(&self) -> CancellationToken;

	/// Deserializes a response body into a generic JSON value.
	fn json_deserialize(&self, body: &str) -> Result<Value> {
		Ok(serde_json::from_str(body)?)
	}
}

/// HTTP operations used during transport start.
pub trait HttpClient: Send + Sync {
	/// Issues the start request and returns the raw response body.
	///
	/// Connection failures, non-success statuses and unreadable bodies are
	/// all reported as `Err`.
	fn get_start_response<'a>(
		&'a self,
		connection: &'a dyn ConnectionLike,
		transport: TransportKind,
		connection_data: Option<&'a str>,
	) -> BoxFuture<'a, Result<String>>;
}

/// Builds the start query string for `connection`.
pub fn start_query(
	connection: &dyn ConnectionLike,
	transport: TransportKind,
	connection_data: Option<&str>,
) -> StartQuery {
	StartQuery {
		transport,
		client_protocol: connection.protocol_version().to_string(),
		connection_token: connection.connection_token().to_string(),
		connection_data: connection_data.map(str::to_string),
	}
}

/// Connection state owned by a client, usable directly as a [`ConnectionLike`].
#[derive(Debug, Clone)]
pub struct ClientConnection {
	url: String,
	connection_token: String,
	config: ConnectionConfig,
	disconnect: CancellationToken,
}

impl ClientConnection {
	/// Creates a connection for `url`. The URL is normalised to end in `/`.
	pub fn new(url: impl Into<String>, connection_token: impl Into<String>, config: ConnectionConfig) -> Self {
		let mut url = url.into();
		if !url.ends_with('/') {
			url.push('/');
		}

		Self {
			url,
			connection_token: connection_token.into(),
			config,
			disconnect: CancellationToken::new(),
		}
	}

	/// Returns the configuration.
	pub fn config(&self) -> &ConnectionConfig {
		&self.config
	}

	/// Trips the disconnect signal. Pending handshakes fail.
	pub fn disconnect(&self) {
		tracing::debug!(url = %self.url, "disconnecting");
		self.disconnect.cancel();
	}

	/// Returns true once [`disconnect`](Self::disconnect) has been called.
	pub fn is_disconnected(&self) -> bool {
		self.disconnect.is_cancelled()
	}
}

impl ConnectionLike for ClientConnection {
	fn url(&self) -> &str {
		&self.url
	}

	fn connection_token(&self) -> &str {
		&self.connection_token
	}

	fn protocol_version(&self) -> &str {
		&self.config.protocol_version
	}

	fn total_transport_connect_timeout(&self) -> Duration {
		self.config.total_transport_connect_timeout()
	}

	fn disconnect_token(&self) -> CancellationToken {
		self.disconnect.clone()
	}
}

#[cfg(test)]
mod tests;
