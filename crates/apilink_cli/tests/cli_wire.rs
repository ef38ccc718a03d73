#![allow(missing_docs)]

use apilink_testkit::{fixture_arg, run, run_json};

const APILINK: &str = env!("CARGO_BIN_EXE_apilink");

#[test]
fn wire_json_lists_generated_and_raw_commands() {
	let api = fixture_arg("api.json");
	let wire = fixture_arg("wire.json");
	let json = run_json(APILINK, &["wire", &api, "--wire", &wire, "--json"]);

	let commands = json["commands"].as_array().expect("commands array");
	assert_eq!(commands.len(), 15);

	let create = commands.iter().find(|item| item["suffix"] == "DeviceCreateBuffer").expect("generated command");
	assert_eq!(create["derived_from"], "device.create buffer");
	let result = &create["members"][2];
	assert_eq!(result["name"], "result");
	assert_eq!(result["type"], "ObjectHandle");
	assert_eq!(result["handle_type"], "buffer");
	assert_eq!(result["is_return_value"], true);

	let map_async = commands.iter().find(|item| item["name"] == "buffer map async").expect("raw command");
	assert!(map_async["derived_from"].is_null());
	assert_eq!(map_async["members"][0]["id_type"], "buffer");

	assert!(commands.iter().all(|item| item["suffix"] != "BufferGetSize"));
	assert_eq!(json["return_commands"].as_array().map(Vec::len), Some(2));
	assert!(
		json["client_handwritten_commands"]
			.as_array()
			.is_some_and(|items| items.iter().any(|item| item == "BufferMapAsync"))
	);
}

#[test]
fn wire_json_shifts_argument_lengths() {
	let api = fixture_arg("api.json");
	let wire = fixture_arg("wire.json");
	let json = run_json(APILINK, &["wire", &api, "--wire", &wire, "--json"]);

	let commands = json["commands"].as_array().expect("commands array");
	let write = commands.iter().find(|item| item["suffix"] == "QueueWriteBuffer").expect("generated command");
	assert_eq!(write["members"][3]["name"], "data");
	assert_eq!(write["members"][3]["length"], "size");
}

#[test]
fn wire_requires_wire_argument() {
	let api = fixture_arg("api.json");
	let output = run(APILINK, &["wire", &api]);
	assert!(!output.status.success());
}
