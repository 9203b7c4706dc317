use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to load config from {}", path.display())]
	Config {
		path: PathBuf,
		#[source]
		source: hubwire_runtime::Error,
	},

	#[error("invalid connection data: {0}")]
	ConnectionData(String),

	#[error(transparent)]
	Runtime(#[from] hubwire_runtime::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
