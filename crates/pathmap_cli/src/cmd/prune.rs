use std::path::PathBuf;

use pathmap::tree::{Result, has_content, prune};
use tracing::debug;

use crate::cmd::util::{emit_json, read_tree};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
}

/// Remove empty values from a JSON document and print the result.
pub fn run(args: Args) -> Result<()> {
	let tree = read_tree(&args.file)?;
	debug!(has_content = has_content(&tree), "pruning document");
	emit_json(&prune(&tree))
}
