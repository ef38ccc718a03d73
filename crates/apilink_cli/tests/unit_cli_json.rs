#![allow(missing_docs)]

use apilink_testkit::{fixture_arg, run, run_json};

const APILINK: &str = env!("CARGO_BIN_EXE_apilink");

#[test]
fn every_command_emits_json() {
	let api = fixture_arg("api.json");
	let wire = fixture_arg("wire.json");
	let fuzz = fixture_arg("fuzz.json");

	let info = run_json(APILINK, &["info", &api, "--json"]);
	let total = info["categories"]
		.as_array()
		.expect("categories array")
		.iter()
		.filter_map(|item| item["count"].as_u64())
		.sum::<u64>();
	assert_eq!(info["item_count"].as_u64(), Some(total));
	assert_eq!(total, 40);

	let types = run_json(APILINK, &["types", &api, "--category", "object", "--json"]);
	assert_eq!(types["count"], 7);

	let show = run_json(APILINK, &["show", &api, "--type", "buffer usage", "--json"]);
	assert_eq!(show["full_mask"], 0xCF);
	assert_eq!(show["c_type"], "WGPUBufferUsageFlags");

	let wire_json = run_json(APILINK, &["wire", &api, "--wire", &wire, "--json"]);
	assert!(wire_json["commands"].is_array());

	let fuzz_json = run_json(APILINK, &["fuzz", &api, "--wire", &wire, "--fuzz", &fuzz, "--json"]);
	assert!(fuzz_json["generated_commands"].is_array());
}

#[test]
fn text_output_lists_categories() {
	let api = fixture_arg("api.json");
	let output = run(APILINK, &["info", &api]);

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("target: headers"));
	assert!(stdout.contains("  structure: 12"));
}

#[test]
fn unknown_target_exits_with_error() {
	let api = fixture_arg("api.json");
	let output = run(APILINK, &["info", &api, "--target", "vulkan"]);

	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: unknown target: vulkan"));
}

#[test]
fn missing_schema_file_exits_with_error() {
	let output = run(APILINK, &["info", "does-not-exist.json"]);

	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: io:"));
}

#[test]
fn debug_logging_reports_schema_loading_on_stderr() {
	let api = fixture_arg("api.json");
	let output = std::process::Command::new(APILINK)
		.args(["info", &api, "--json"])
		.env("RUST_LOG", "apilink=debug")
		.output()
		.expect("command executes");

	assert!(output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("loading schemas"), "stderr: {stderr}");
	assert!(stderr.contains("linking api model"), "stderr: {stderr}");
	serde_json::from_slice::<serde_json::Value>(&output.stdout).expect("stdout stays valid json");
}
