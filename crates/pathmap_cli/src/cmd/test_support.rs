use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

use pathmap_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static PATHMAP_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_arg(name: &str) -> String {
	shared_fixture_path(name).to_string_lossy().into_owned()
}

pub(crate) fn run_pathmap(args: &[&str]) -> Output {
	Command::new(pathmap_bin()).args(args).output().expect("pathmap command executes")
}

pub(crate) fn run_pathmap_stdin(args: &[&str], input: &str) -> Output {
	let mut child = Command::new(pathmap_bin())
		.args(args)
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("pathmap command spawns");
	child
		.stdin
		.take()
		.expect("stdin is piped")
		.write_all(input.as_bytes())
		.expect("stdin accepts input");
	child.wait_with_output().expect("pathmap command completes")
}

pub(crate) fn expect_json(output: Output) -> serde_json::Value {
	assert!(
		output.status.success(),
		"pathmap command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

pub(crate) fn run_pathmap_json(args: &[&str]) -> serde_json::Value {
	expect_json(run_pathmap(args))
}

pub(crate) fn expect_failure(output: &Output) -> String {
	assert_eq!(output.status.code(), Some(1), "expected exit code 1");
	let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
	assert!(stderr.lines().any(|line| line.starts_with("error: ")), "unexpected stderr: {stderr}");
	stderr
}

fn pathmap_bin() -> &'static PathBuf {
	PATHMAP_BIN.get_or_init(resolve_pathmap_bin)
}

fn resolve_pathmap_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_pathmap") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "pathmap.exe" } else { "pathmap" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "pathmap"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build pathmap binary at {}", bin.display());

	bin
}
