use std::path::PathBuf;

use pathmap::tree::{GetOptions, Path, Result, get_path};
use tracing::debug;

use crate::cmd::util::{emit_json, parse_json_arg, read_tree};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	pub path: String,
	#[arg(long, value_name = "JSON")]
	pub default: Option<String>,
	#[arg(long)]
	pub flatten: bool,
}

/// Resolve a path expression against a JSON document and print the result.
pub fn run(args: Args) -> Result<()> {
	let path = Path::parse(&args.path)?;
	let mut options = GetOptions::default();
	if let Some(default) = &args.default {
		options.default = parse_json_arg(default)?;
	}
	options.flatten = args.flatten;

	let tree = read_tree(&args.file)?;
	let result = get_path(&tree, &path, &options)?;
	debug!(path = %path, kind = result.kind(), "resolved");
	emit_json(&result)
}
