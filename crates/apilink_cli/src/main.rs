#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "apilink", about = "GPU API schema linking and wire derivation tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Types(cmd::types::Args),
	Show(cmd::show::Args),
	Wire(cmd::wire::Args),
	Fuzz(cmd::fuzz::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> apilink::schema::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Types(args) => cmd::types::run(args),
		Commands::Show(args) => cmd::show::run(args),
		Commands::Wire(args) => cmd::wire::run(args),
		Commands::Fuzz(args) => cmd::fuzz::run(args),
	}
}
