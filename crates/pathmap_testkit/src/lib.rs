//! Fixture and build-directory helpers shared by the workspace test suites.

use std::path::{Path, PathBuf};

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir.ancestors().nth(2).unwrap_or(manifest_dir).to_path_buf()
}

/// Path of a JSON document under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Raw text of a fixture document.
pub fn fixture_text(name: &str) -> String {
	let path = fixture_path(name);
	std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {} readable: {err}", path.display()))
}

/// Fixture document parsed with `serde_json`.
pub fn load_fixture(name: &str) -> serde_json::Value {
	serde_json::from_str(&fixture_text(name)).unwrap_or_else(|err| panic!("fixture {name} is valid json: {err}"))
}

/// Cargo target directory, honoring `CARGO_TARGET_DIR`.
pub fn target_dir() -> PathBuf {
	match std::env::var_os("CARGO_TARGET_DIR") {
		Some(dir) => PathBuf::from(dir),
		None => workspace_root().join("target"),
	}
}
