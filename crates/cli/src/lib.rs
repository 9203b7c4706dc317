//! hubwire command line: probes the transport start handshake of a hub endpoint.

pub mod cli;
pub mod error;
pub mod http;
pub mod logging;
pub mod probe;

pub use error::{CliError, Result};
