use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::*;

fn probe_args(args: Vec<&str>) -> ProbeArgs {
	let cli = Cli::try_parse_from(args).unwrap();
	match cli.command {
		Commands::Probe(args) => args,
	}
}

#[test]
fn parse_probe_defaults() {
	let args = probe_args(vec!["hubwire", "probe", "http://localhost/signalr"]);

	assert_eq!(args.url, "http://localhost/signalr");
	assert_eq!(args.connection_token, "");
	assert_eq!(args.transport, None);
	assert_eq!(args.connection_data, None);
	assert_eq!(args.timeout_ms, None);
	assert_eq!(args.config, None);
	assert!(!args.json);

	let config = args.resolve_config().unwrap();
	assert_eq!(config, ConnectionConfig::default());
}

#[test]
fn parse_probe_flags() {
	let args = probe_args(vec![
		"hubwire",
		"probe",
		"http://localhost/signalr/",
		"--connection-token",
		"abc",
		"--transport",
		"webSockets",
		"--connection-data",
		r#"[{"name":"chat"}]"#,
		"--timeout-ms",
		"250",
		"--json",
	]);

	assert_eq!(args.connection_token, "abc");
	assert_eq!(args.transport, Some(CliTransport::WebSockets));
	assert_eq!(args.connection_data().unwrap(), Some(r#"[{"name":"chat"}]"#));
	assert!(args.json);

	let config = args.resolve_config().unwrap();
	assert_eq!(config.transport, TransportKind::WebSockets);
	assert_eq!(config.total_transport_connect_timeout(), Duration::from_millis(250));
}

#[test]
fn parse_transport_aliases() {
	let args = probe_args(vec!["hubwire", "probe", "http://h/", "-t", "sse"]);
	assert_eq!(args.transport, Some(CliTransport::ServerSentEvents));

	let args = probe_args(vec!["hubwire", "probe", "http://h/", "-t", "ws"]);
	assert_eq!(args.transport, Some(CliTransport::WebSockets));
}

#[test]
fn parse_rejects_unknown_transport() {
	let result = Cli::try_parse_from(vec!["hubwire", "probe", "http://h/", "-t", "carrier-pigeon"]);
	assert!(result.is_err());
}

#[test]
fn verbose_is_global_and_counted() {
	let cli = Cli::try_parse_from(vec!["hubwire", "probe", "http://h/", "-vv"]).unwrap();
	assert_eq!(cli.verbose, 2);
}

#[test]
fn flags_override_config_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	write!(
		file,
		r#"{{"transportConnectTimeoutMs": 900, "transport": "foreverFrame", "protocolVersion": "1.3"}}"#
	)
	.unwrap();
	let path = file.path().to_str().unwrap().to_string();

	let args = probe_args(vec!["hubwire", "probe", "http://h/", "--config", &path, "--timeout-ms", "100"]);
	let config = args.resolve_config().unwrap();

	assert_eq!(config.transport_connect_timeout_ms, 100);
	assert_eq!(config.transport, TransportKind::ForeverFrame);
	assert_eq!(config.protocol_version, "1.3");
}

#[test]
fn missing_config_file_names_the_path() {
	let args = ProbeArgs {
		config: Some(PathBuf::from("/definitely/not/here.json")),
		..probe_args(vec!["hubwire", "probe", "http://h/"])
	};

	let err = args.resolve_config().unwrap_err();
	assert!(matches!(err, CliError::Config { .. }), "got {err:?}");
	assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn invalid_connection_data_is_rejected() {
	let args = probe_args(vec!["hubwire", "probe", "http://h/", "--connection-data", "{not json"]);
	assert!(matches!(args.connection_data(), Err(CliError::ConnectionData(_))));
}
