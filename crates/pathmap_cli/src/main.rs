#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cmd;

#[derive(Parser)]
#[command(name = "pathmap", about = "Resolve, rewrite, and prune JSON trees with path expressions")]
struct Cli {
	/// Log at debug level when RUST_LOG is unset.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the segments of a path expression.
	Parse(cmd::parse::Args),
	/// Resolve a path against a JSON document.
	Get(cmd::get::Args),
	/// Write a JSON value at a keypath.
	Set(cmd::set::Args),
	/// Tombstone nodes at one or more keypaths.
	Drop(cmd::drop::Args),
	/// Remove empty values.
	Prune(cmd::prune::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> pathmap::tree::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Parse(args) => cmd::parse::run(args),
		Commands::Get(args) => cmd::get::run(args),
		Commands::Set(args) => cmd::set::run(args),
		Commands::Drop(args) => cmd::drop::run(args),
		Commands::Prune(args) => cmd::prune::run(args),
	}
}

fn init_tracing(verbose: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}
