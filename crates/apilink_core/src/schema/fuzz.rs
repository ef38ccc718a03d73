use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::schema::{ApiModel, Category, Command, Length, RecordMember, Result, SchemaError, TypeId, WireModel};

/// Structured-fuzzing (LPM) harness configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuzzSchema {
	/// Commands left out of the harness entirely.
	#[serde(default)]
	pub blocklisted_cmds: Vec<String>,
	/// Commands whose harness code is handwritten.
	#[serde(default)]
	pub custom_cmds: Vec<String>,
	/// Opaque harness settings, passed through.
	#[serde(default)]
	pub lpm_info: Option<Value>,
}

impl FuzzSchema {
	/// Read the fuzz schema from parsed JSON.
	pub fn from_value(value: &Value) -> Result<Self> {
		if !value.is_object() {
			return Err(SchemaError::InvalidSchemaRoot { schema: "fuzz" });
		}
		Ok(Self::deserialize(value)?)
	}
}

/// Command sets for the fuzz harness.
#[derive(Debug, Clone)]
pub struct FuzzModel {
	/// Non-blocklisted commands without custom harness code.
	pub generated_commands: Vec<Command>,
	/// Every non-blocklisted command, custom ones included.
	pub all_commands: Vec<Command>,
	/// Per structure, member indices that only carry another member's length.
	pub skipped_structure_members: BTreeMap<TypeId, BTreeSet<usize>>,
	/// Opaque harness settings from the schema.
	pub lpm_info: Option<Value>,
}

impl FuzzModel {
	/// Partition wire commands for the harness and mark length members.
	///
	/// The harness regenerates lengths from decoded payload sizes, so length
	/// members are flagged `skip_serialize` on the returned command copies and
	/// listed per structure in `skipped_structure_members`.
	pub fn derive(api: &ApiModel, wire: &WireModel, schema: &FuzzSchema) -> Self {
		let blocklisted: HashSet<&str> = schema.blocklisted_cmds.iter().map(String::as_str).collect();
		let custom: HashSet<&str> = schema.custom_cmds.iter().map(String::as_str).collect();

		let mut generated_commands = Vec::new();
		let mut all_commands = Vec::new();
		for command in &wire.commands {
			let name = command.name.get();
			if blocklisted.contains(name) {
				continue;
			}

			let mut command = command.clone();
			mark_length_members(&mut command.members);
			if !custom.contains(name) {
				generated_commands.push(command.clone());
			}
			all_commands.push(command);
		}

		let mut skipped_structure_members = BTreeMap::new();
		for &id in api.by_category(Category::Structure) {
			let Some(structure) = api.get(id).as_structure() else {
				continue;
			};
			let skipped = length_member_indices(&structure.members);
			if !skipped.is_empty() {
				skipped_structure_members.insert(id, skipped);
			}
		}

		debug!(
			generated = generated_commands.len(),
			all = all_commands.len(),
			structures_with_lengths = skipped_structure_members.len(),
			"derived fuzz commands"
		);

		Self {
			generated_commands,
			all_commands,
			skipped_structure_members,
			lpm_info: schema.lpm_info.clone(),
		}
	}

	/// Whether a structure member is left out of harness serialization.
	pub fn skips_structure_member(&self, structure: TypeId, member: usize) -> bool {
		self.skipped_structure_members.get(&structure).is_some_and(|items| items.contains(&member))
	}
}

/// Indices of members named as another member's length.
pub fn length_member_indices(members: &[RecordMember]) -> BTreeSet<usize> {
	members
		.iter()
		.filter_map(|member| match member.length {
			Length::Member(idx) => Some(idx),
			_ => None,
		})
		.collect()
}

fn mark_length_members(members: &mut [RecordMember]) {
	for idx in length_member_indices(members) {
		if let Some(member) = members.get_mut(idx) {
			member.skip_serialize = true;
		}
	}
}

#[cfg(test)]
mod tests;
