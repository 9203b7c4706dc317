#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hubwire_protocol::TransportKind;
use hubwire_runtime::ConnectionConfig;

use crate::error::{CliError, Result};

/// Root CLI for hubwire.
#[derive(Parser, Debug)]
#[command(name = "hubwire")]
#[command(about = "Probe the transport start handshake of a hub endpoint")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run one start handshake against an endpoint and report its outcome.
	Probe(ProbeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
	/// Connection base URL (for example: http://localhost:8080/signalr/)
	#[arg(value_name = "URL")]
	pub url: String,

	/// Token issued by the negotiate step.
	#[arg(long, value_name = "TOKEN", default_value = "")]
	pub connection_token: String,

	/// Transport to start (overrides config)
	#[arg(short, long, value_enum)]
	pub transport: Option<CliTransport>,

	/// Connection data sent with the start request, as JSON.
	#[arg(long, value_name = "JSON")]
	pub connection_data: Option<String>,

	/// Connect timeout in milliseconds (overrides config)
	#[arg(long, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Client protocol version (overrides config)
	#[arg(long, value_name = "VERSION")]
	pub protocol_version: Option<String>,

	/// JSON config file with connection settings.
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Print the outcome as a JSON object.
	#[arg(long)]
	pub json: bool,
}

impl ProbeArgs {
	/// Loads the config file, if any, then applies command line overrides.
	pub fn resolve_config(&self) -> Result<ConnectionConfig> {
		let mut config = match &self.config {
			Some(path) => ConnectionConfig::from_json_file(path).map_err(|source| CliError::Config {
				path: path.clone(),
				source,
			})?,
			None => ConnectionConfig::default(),
		};

		if let Some(transport) = self.transport {
			config.transport = transport.into();
		}
		if let Some(ms) = self.timeout_ms {
			config.transport_connect_timeout_ms = ms;
		}
		if let Some(version) = &self.protocol_version {
			config.protocol_version = version.clone();
		}

		Ok(config)
	}

	/// Validated connection data, if given.
	pub fn connection_data(&self) -> Result<Option<&str>> {
		let Some(data) = self.connection_data.as_deref() else {
			return Ok(None);
		};
		serde_json::from_str::<serde_json::Value>(data).map_err(|e| CliError::ConnectionData(e.to_string()))?;
		Ok(Some(data))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CliTransport {
	/// HTTP long polling
	#[default]
	#[value(name = "longPolling", alias = "long-polling")]
	LongPolling,
	/// Server-sent events
	#[value(name = "serverSentEvents", alias = "sse")]
	ServerSentEvents,
	/// Forever frame
	#[value(name = "foreverFrame", alias = "forever-frame")]
	ForeverFrame,
	/// WebSockets
	#[value(name = "webSockets", alias = "ws")]
	WebSockets,
}

impl From<CliTransport> for TransportKind {
	fn from(transport: CliTransport) -> Self {
		match transport {
			CliTransport::LongPolling => TransportKind::LongPolling,
			CliTransport::ServerSentEvents => TransportKind::ServerSentEvents,
			CliTransport::ForeverFrame => TransportKind::ForeverFrame,
			CliTransport::WebSockets => TransportKind::WebSockets,
		}
	}
}
