//! Start acknowledgement: the request that asks the server to activate a transport.
//!
//! One call yields exactly one of:
//! - `Ok(())` when the body's `Response` field is exactly `"started"`
//! - [`HandshakeError::StartRejected`] for any other value or an unparseable body
//! - [`HandshakeError::StartRequestError`] when the request itself fails
//!
//! Timeouts and disconnects are decided by the coordinator, never here.

use std::sync::Arc;

use hubwire_protocol::{START_ACKNOWLEDGED, START_RESPONSE_FIELD, TransportKind};
use serde_json::Value;

use crate::connection::{ConnectionLike, HttpClient};
use crate::error::HandshakeError;

/// Issues the start request and interprets the response.
pub async fn request_start(
	connection: &dyn ConnectionLike,
	http: &dyn HttpClient,
	transport: TransportKind,
	connection_data: Option<&str>,
) -> Result<(), HandshakeError> {
	tracing::debug!(url = connection.url(), %transport, "requesting transport start");

	let body = http
		.get_start_response(connection, transport, connection_data)
		.await
		.map_err(|e| {
			tracing::debug!(error = %e, "start request failed");
			HandshakeError::StartRequestError(Arc::new(e))
		})?;

	interpret_start_response(connection, &body)
}

/// Decides whether a start response body acknowledges the transport.
pub fn interpret_start_response(connection: &dyn ConnectionLike, body: &str) -> Result<(), HandshakeError> {
	let value = connection
		.json_deserialize(body)
		.map_err(|e| HandshakeError::StartRejected {
			detail: format!("unparseable start response: {e}"),
		})?;

	match value.get(START_RESPONSE_FIELD) {
		Some(Value::String(s)) if s == START_ACKNOWLEDGED => Ok(()),
		Some(other) => Err(HandshakeError::StartRejected {
			detail: format!("{START_RESPONSE_FIELD} was {other}"),
		}),
		None => Err(HandshakeError::StartRejected {
			detail: format!("missing {START_RESPONSE_FIELD} field"),
		}),
	}
}
