use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is unset.
///
/// Handshake outcomes are printed on stdout, so the default stays quiet.
fn default_directives(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "error",
		1 => "warn,hubwire_runtime=info,hubwire_cli=info",
		_ => "debug,hyper_util=info,reqwest=info",
	}
}

/// Installs the global subscriber, writing compact lines to stderr.
pub fn init_logging(verbosity: u8) {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_raises_hubwire_levels() {
		assert_eq!(default_directives(0), "error");
		assert!(default_directives(1).contains("hubwire_runtime=info"));
		assert!(default_directives(2).starts_with("debug"));
		assert_eq!(default_directives(7), default_directives(2));
	}

	#[test]
	fn directives_parse() {
		for verbosity in 0..3 {
			EnvFilter::try_new(default_directives(verbosity)).unwrap();
		}
	}
}
