use std::io::Read;
use std::path::Path;

use pathmap::tree::{Keypath, Result, Value};
use tracing::debug;

/// Read and parse a JSON document from `file`, or from stdin when `file` is `-`.
pub(crate) fn read_tree(file: &Path) -> Result<Value> {
	let text = if file == Path::new("-") {
		let mut text = String::new();
		std::io::stdin().read_to_string(&mut text)?;
		text
	} else {
		std::fs::read_to_string(file)?
	};
	debug!(source = %file.display(), bytes = text.len(), "read document");
	Value::from_json_str(&text)
}

/// Parse a JSON literal given on the command line.
pub(crate) fn parse_json_arg(text: &str) -> Result<Value> {
	Value::from_json_str(text)
}

/// Parse every keypath argument, failing on the first invalid one.
pub(crate) fn parse_keypaths(items: &[String]) -> Result<Vec<Keypath>> {
	items.iter().map(|item| Keypath::parse(item)).collect()
}

/// Print `payload` to stdout as pretty JSON.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
