use std::path::PathBuf;

use pathmap::tree::{Result, drop_at};

use crate::cmd::util::{emit_json, parse_keypaths, read_tree};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(required = true)]
	pub keypaths: Vec<String>,
}

/// Tombstone the nodes at the given keypaths and print the document.
pub fn run(args: Args) -> Result<()> {
	let keypaths = parse_keypaths(&args.keypaths)?;
	let tree = read_tree(&args.file)?;
	emit_json(&drop_at(&tree, keypaths)?)
}
