use clap::Parser;
use hubwire_cli::cli::{Cli, Commands};
use hubwire_cli::{logging, probe};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let result = match cli.command {
		Commands::Probe(args) => probe::execute(args).await,
	};

	match result {
		Ok(report) if report.ok => {}
		Ok(_) => std::process::exit(1),
		Err(err) => {
			error!(target = "hubwire", error = %err, "command failed");
			eprintln!("error: {err}");
			std::process::exit(2);
		}
	}
}
