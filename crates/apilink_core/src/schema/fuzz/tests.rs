use serde_json::json;

use crate::schema::{ApiModel, FuzzModel, FuzzSchema, SchemaError, TagFilter, WireModel, WireSchema, length_member_indices};

fn models() -> (ApiModel, WireModel) {
	let api = ApiModel::parse(
		&json!({
			"void": {"category": "native"},
			"uint32_t": {"category": "native"},
			"size_t": {"category": "native"},
			"ObjectHandle": {"category": "native", "wire transparent": false},
			"bind group entry": {"category": "structure", "members": [{"name": "binding", "type": "uint32_t"}]},
			"bind group descriptor": {
				"category": "structure",
				"members": [
					{"name": "entry count", "type": "size_t"},
					{"name": "entries", "type": "bind group entry", "annotation": "const*", "length": "entry count"}
				]
			},
			"bind group": {"category": "object"},
			"device": {
				"category": "object",
				"methods": [
					{"name": "create bind group", "returns": "bind group", "args": [
						{"name": "descriptor", "type": "bind group descriptor", "annotation": "const*", "length": 1}
					]},
					{"name": "tick"},
					{"name": "destroy"}
				]
			},
			"queue": {
				"category": "object",
				"methods": [
					{"name": "write", "args": [
						{"name": "data", "type": "uint32_t", "annotation": "const*", "length": "size"},
						{"name": "size", "type": "size_t"}
					]}
				]
			}
		}),
		&TagFilter::wire(),
	)
	.expect("api links");
	let wire = WireModel::derive(&api, &WireSchema::from_value(&json!({})).expect("wire schema")).expect("wire derives");
	(api, wire)
}

fn names(commands: &[crate::schema::Command]) -> Vec<&str> {
	commands.iter().map(|command| command.name.get()).collect()
}

#[test]
fn blocklisted_and_custom_commands_are_partitioned() {
	let (api, wire) = models();
	let schema = FuzzSchema::from_value(&json!({
		"blocklisted_cmds": ["device destroy"],
		"custom_cmds": ["device tick"],
		"lpm_info": {"max_objects": 16}
	}))
	.expect("fuzz schema parses");

	let fuzz = FuzzModel::derive(&api, &wire, &schema);
	assert_eq!(names(&fuzz.all_commands), vec!["device create bind group", "device tick", "queue write"]);
	assert_eq!(names(&fuzz.generated_commands), vec!["device create bind group", "queue write"]);
	assert_eq!(fuzz.lpm_info, Some(json!({"max_objects": 16})));
}

#[test]
fn length_members_skip_serialization_on_copies() {
	let (api, wire) = models();
	let fuzz = FuzzModel::derive(&api, &wire, &FuzzSchema::default());

	let command = fuzz.all_commands.iter().find(|command| command.name.get() == "queue write").expect("kept");
	assert!(command.members[2].skip_serialize);
	assert!(!command.members[1].skip_serialize);

	let original = wire.command("queue write").expect("generated");
	assert!(original.members.iter().all(|member| !member.skip_serialize));
}

#[test]
fn structure_length_members_are_listed() {
	let (api, wire) = models();
	let fuzz = FuzzModel::derive(&api, &wire, &FuzzSchema::default());

	let descriptor = api.lookup("bind group descriptor").expect("declared");
	let entry = api.lookup("bind group entry").expect("declared");
	assert!(fuzz.skips_structure_member(descriptor, 0));
	assert!(!fuzz.skips_structure_member(descriptor, 1));
	assert!(!fuzz.skips_structure_member(entry, 0));
	assert_eq!(fuzz.skipped_structure_members.len(), 1);

	let members = &api.get(descriptor).as_structure().expect("structure payload").members;
	assert_eq!(length_member_indices(members).into_iter().collect::<Vec<_>>(), vec![0]);
	assert!(!members[0].skip_serialize);
}

#[test]
fn unknown_commands_in_lists_are_ignored() {
	let (api, wire) = models();
	let schema = FuzzSchema::from_value(&json!({"blocklisted_cmds": ["no such command"]})).expect("fuzz schema parses");
	let fuzz = FuzzModel::derive(&api, &wire, &schema);
	assert_eq!(fuzz.all_commands.len(), wire.commands.len());
	assert_eq!(fuzz.generated_commands.len(), wire.commands.len());
}

#[test]
fn fuzz_root_must_be_object() {
	let err = FuzzSchema::from_value(&json!([])).expect_err("array root");
	assert!(matches!(err, SchemaError::InvalidSchemaRoot { schema: "fuzz" }));
}
