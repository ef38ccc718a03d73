//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Fixture path rendered as a command-line argument.
pub fn fixture_arg(name: &str) -> String {
	fixture_path(name).to_string_lossy().into_owned()
}

/// Read and parse a JSON fixture, panicking with the path on failure.
pub fn load_fixture(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()));
	serde_json::from_str(&text).unwrap_or_else(|err| panic!("parse fixture {}: {err}", path.display()))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Run a built binary with `args`.
pub fn run(bin: &str, args: &[&str]) -> Output {
	Command::new(bin)
		.args(args)
		.output()
		.unwrap_or_else(|err| panic!("run {bin} {}: {err}", args.join(" ")))
}

/// Run a built binary, require success, and parse stdout as JSON.
pub fn run_json(bin: &str, args: &[&str]) -> serde_json::Value {
	let output = run(bin, args);
	assert!(
		output.status.success(),
		"{} failed with status={}: {}",
		args.join(" "),
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
