use std::time::Duration;

use hubwire_protocol::TransportKind;

use super::*;

fn connection() -> ClientConnection {
	let config = ConnectionConfig {
		transport_connect_timeout_ms: 250,
		..ConnectionConfig::default()
	};
	ClientConnection::new("http://localhost:8080/signalr", "token-1", config)
}

#[test]
fn url_gets_trailing_slash() {
	assert_eq!(connection().url(), "http://localhost:8080/signalr/");

	let already = ClientConnection::new("http://localhost/x/", "t", ConnectionConfig::default());
	assert_eq!(already.url(), "http://localhost/x/");
}

#[test]
fn timeout_comes_from_config() {
	assert_eq!(connection().total_transport_connect_timeout(), Duration::from_millis(250));
}

#[test]
fn disconnect_trips_shared_token() {
	let conn = connection();
	let token = conn.disconnect_token();
	assert!(!token.is_cancelled());

	conn.disconnect();

	assert!(token.is_cancelled());
	assert!(conn.is_disconnected());
	assert!(conn.clone().disconnect_token().is_cancelled());
}

#[test]
fn json_deserialize_default_uses_serde_json() {
	let conn = connection();
	let value = conn.json_deserialize(r#"{"Response":"started"}"#).unwrap();
	assert_eq!(value["Response"], "started");

	let err = conn.json_deserialize("{").unwrap_err();
	assert!(matches!(err, crate::Error::Json(_)));
}

#[test]
fn start_query_carries_connection_settings() {
	let conn = connection();
	let query = start_query(&conn, TransportKind::WebSockets, Some(r#"[{"name":"chat"}]"#));

	assert_eq!(query.transport, TransportKind::WebSockets);
	assert_eq!(query.client_protocol, "1.4");
	assert_eq!(query.connection_token, "token-1");
	assert_eq!(query.connection_data.as_deref(), Some(r#"[{"name":"chat"}]"#));
}
