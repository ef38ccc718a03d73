#![allow(missing_docs)]

use std::sync::Arc;

use apilink::schema::{GenerationContext, SchemaError, SchemaSet, Target, TagFilter, load_json};
use apilink_testkit::{fixture_path, target_dir};

fn full_set() -> SchemaSet {
	let wire = fixture_path("wire.json");
	let fuzz = fixture_path("fuzz.json");
	SchemaSet::load(&fixture_path("api.json"), Some(wire.as_path()), Some(fuzz.as_path())).expect("fixtures load")
}

#[test]
fn targets_with_same_tags_share_one_model() {
	let mut context = GenerationContext::new(full_set());
	let targets = Target::parse_list("headers,cpp,mock_api,webgpu_headers,wire,dawn_lpmfuzz_proto").expect("targets parse");
	let prepared = context.prepare(&targets).expect("models build");

	assert_eq!(prepared.len(), 6);
	assert!(Arc::ptr_eq(&prepared[0].api, &prepared[1].api));
	assert!(Arc::ptr_eq(&prepared[0].api, &prepared[2].api));
	assert!(!Arc::ptr_eq(&prepared[0].api, &prepared[3].api));
	assert!(Arc::ptr_eq(&prepared[4].api, &prepared[5].api));
	assert_eq!(prepared[3].api.filter, TagFilter::upstream());

	assert!(prepared[0].wire.is_none());
	let wire = prepared[4].wire.as_ref().expect("wire model");
	let fuzz_wire = prepared[5].wire.as_ref().expect("wire model");
	assert!(Arc::ptr_eq(wire, fuzz_wire));
	assert!(prepared[4].fuzz.is_none());
	assert!(prepared[5].fuzz.is_some());
}

#[test]
fn wire_target_without_wire_schema_fails() {
	let schemas = SchemaSet::load(&fixture_path("api.json"), None, None).expect("api loads");
	let mut context = GenerationContext::new(schemas);

	let headers = context.prepare(&[Target::Headers]).expect("headers need only the api schema");
	assert_eq!(headers.len(), 1);

	let err = context.prepare(&[Target::Wire]).expect_err("wire schema missing");
	assert!(matches!(err, SchemaError::MissingSchema { schema: "wire", .. }));
}

#[test]
fn zstd_compressed_schema_loads() {
	let text = std::fs::read(fixture_path("api.json")).expect("fixture reads");
	let packed = zstd::stream::encode_all(&text[..], 3).expect("compresses");

	let dir = target_dir().join("apilink-tests");
	std::fs::create_dir_all(&dir).expect("scratch dir");
	let path = dir.join("api.json.zst");
	std::fs::write(&path, packed).expect("compressed fixture writes");

	let compressed = load_json(&path).expect("compressed schema loads");
	let plain = load_json(fixture_path("api.json")).expect("plain schema loads");
	assert_eq!(compressed, plain);
}

#[test]
fn invalid_json_is_reported() {
	let dir = target_dir().join("apilink-tests");
	std::fs::create_dir_all(&dir).expect("scratch dir");
	let path = dir.join("broken.json");
	std::fs::write(&path, b"{\"void\": ").expect("broken fixture writes");

	let err = load_json(&path).expect_err("truncated json");
	assert!(matches!(err, SchemaError::Json(_)));
}
