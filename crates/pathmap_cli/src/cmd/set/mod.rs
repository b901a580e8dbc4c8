use std::path::PathBuf;

use pathmap::tree::{Keypath, Result, set_in};
use tracing::warn;

use crate::cmd::util::{emit_json, parse_json_arg, read_tree};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	pub keypath: String,
	#[arg(value_name = "JSON")]
	pub value: String,
}

/// Write a JSON value at a keypath and print the updated document.
pub fn run(args: Args) -> Result<()> {
	let keypath = Keypath::parse(&args.keypath)?;
	let value = parse_json_arg(&args.value)?;
	let mut tree = read_tree(&args.file)?;

	if !set_in(&mut tree, &keypath, value) {
		warn!(keypath = %keypath, "keypath has no parent node; document unchanged");
	}
	emit_json(&tree)
}
