//! Start endpoint request parameters and response body.
//!
//! After a transport has connected, the client issues a GET to the `start`
//! endpoint. The server answers with a small JSON object:
//!
//! ```text
//! GET {url}start?transport=webSockets&clientProtocol=1.4&connectionToken=..&connectionData=..
//!
//! {"Response":"started"}
//! ```
//!
//! Anything other than the exact string `started` in the `Response` field is a
//! rejection.

use serde::{Deserialize, Serialize};

use crate::transport::TransportKind;

/// Name of the field carrying the acknowledgement.
pub const START_RESPONSE_FIELD: &str = "Response";

/// Value of [`START_RESPONSE_FIELD`] that acknowledges a started transport.
pub const START_ACKNOWLEDGED: &str = "started";

/// Client protocol version sent when none is configured.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.4";

/// Path segment of the start endpoint, relative to the connection URL.
pub const START_PATH: &str = "start";

/// Query string parameters of the start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuery {
	pub transport: TransportKind,
	pub client_protocol: String,
	pub connection_token: String,
	/// Opaque per-connection data (usually the JSON list of hubs)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub connection_data: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn start_query_omits_missing_connection_data() {
		let query = StartQuery {
			transport: TransportKind::ServerSentEvents,
			client_protocol: DEFAULT_PROTOCOL_VERSION.to_string(),
			connection_token: "tok".to_string(),
			connection_data: None,
		};
		let json = serde_json::to_value(&query).unwrap();
		assert_eq!(json["transport"], "serverSentEvents");
		assert_eq!(json["clientProtocol"], "1.4");
		assert_eq!(json["connectionToken"], "tok");
		assert!(json.get("connectionData").is_none());
	}
}
