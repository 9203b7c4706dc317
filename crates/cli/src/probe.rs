//! `hubwire probe`: one start handshake against a live endpoint.
//!
//! The probe plays the owning connection. It treats the transport as already
//! connected, reports success to the coordinator (which sends the start
//! request) and waits for the single outcome. Ctrl-C trips the connection's
//! disconnect signal.

use std::sync::Arc;

use colored::Colorize;
use hubwire_protocol::TransportKind;
use hubwire_runtime::{ClientConnection, HandshakeCoordinator, HandshakeError, HttpClient};
use serde::Serialize;
use tokio::time::Instant;

use crate::cli::ProbeArgs;
use crate::error::Result;
use crate::http::ReqwestHttpClient;

/// Result of a probe, printed as text or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
	pub ok: bool,
	pub transport: TransportKind,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cause: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	pub elapsed_ms: u64,
}

impl ProbeReport {
	fn new(transport: TransportKind, elapsed_ms: u64, result: std::result::Result<(), HandshakeError>) -> Self {
		match result {
			Ok(()) => Self {
				ok: true,
				transport,
				cause: None,
				message: None,
				elapsed_ms,
			},
			Err(e) => Self {
				ok: false,
				transport,
				cause: Some(e.cause().as_str()),
				message: Some(error_chain(&e)),
				elapsed_ms,
			},
		}
	}

	/// One line summary for terminal output.
	pub fn to_text(&self) -> String {
		match (&self.cause, &self.message) {
			(Some(cause), Some(message)) => {
				format!("{}: failed ({cause}) after {}ms: {message}", self.transport, self.elapsed_ms)
			}
			_ => format!("{}: started in {}ms", self.transport, self.elapsed_ms),
		}
	}
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
	let mut out = err.to_string();
	let mut source = err.source();
	while let Some(inner) = source {
		out.push_str(": ");
		out.push_str(&inner.to_string());
		source = inner.source();
	}
	out
}

/// Runs one handshake over `connection` and waits for its outcome.
pub async fn run_probe(
	connection: Arc<ClientConnection>,
	http: Arc<dyn HttpClient>,
	connection_data: Option<&str>,
) -> Result<ProbeReport> {
	let transport = connection.config().transport;
	let started = Instant::now();

	let mut builder = HandshakeCoordinator::builder(connection, http)
		.transport(transport)
		.on_failure(move |err| {
			tracing::info!(%transport, cause = %err.cause(), "probe handshake failed");
		});
	if let Some(data) = connection_data {
		builder = builder.connection_data(data);
	}

	let coordinator = builder.start()?;
	coordinator.report_success();
	let result = coordinator.outcome().await;

	let elapsed_ms = started.elapsed().as_millis() as u64;
	Ok(ProbeReport::new(transport, elapsed_ms, result))
}

/// Entry point for the `probe` subcommand. Prints the report to stdout.
pub async fn execute(args: ProbeArgs) -> Result<ProbeReport> {
	let config = args.resolve_config()?;
	let connection_data = args.connection_data()?;
	let connection = Arc::new(ClientConnection::new(
		args.url.as_str(),
		args.connection_token.as_str(),
		config,
	));
	let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);

	let interrupt = {
		let connection = Arc::clone(&connection);
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				tracing::info!("interrupted, disconnecting");
				connection.disconnect();
			}
		})
	};

	let report = run_probe(connection, http, connection_data).await;
	interrupt.abort();
	let report = report?;

	if args.json {
		println!("{}", serde_json::to_string(&report)?);
	} else if report.ok {
		println!("{}", report.to_text().green());
	} else {
		println!("{}", report.to_text().red());
	}

	Ok(report)
}
