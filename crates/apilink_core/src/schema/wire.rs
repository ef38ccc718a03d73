use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::schema::link::{Resolver, members_may_have_handle};
use crate::schema::raw::RawMember;
use crate::schema::{ApiModel, Category, Length, Name, RecordMember, Result, SchemaError, TypeId, TypeNode};

/// Declared name of the opaque handle type carried by `result` members.
pub const OBJECT_HANDLE: &str = "ObjectHandle";

/// Name lists from the wire schema's `special items` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialItems {
	/// Commands whose client side is written by hand.
	#[serde(default)]
	pub client_handwritten_commands: Vec<String>,
	/// Methods fully implemented on the client that never cross the wire.
	#[serde(default)]
	pub client_side_commands: Vec<String>,
	/// Other lists, passed through to consumers.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct WireFile {
	#[serde(default)]
	commands: Map<String, Value>,
	#[serde(rename = "return commands", default)]
	return_commands: Map<String, Value>,
	#[serde(rename = "special items", default)]
	special_items: SpecialItems,
}

/// Parsed wire protocol schema, not yet linked.
#[derive(Debug, Clone)]
pub struct WireSchema {
	commands: Vec<(String, Vec<RawMember>)>,
	return_commands: Vec<(String, Vec<RawMember>)>,
	/// Special name lists.
	pub special_items: SpecialItems,
}

impl WireSchema {
	/// Read the wire schema from parsed JSON.
	pub fn from_value(value: &Value) -> Result<Self> {
		if !value.is_object() {
			return Err(SchemaError::InvalidSchemaRoot { schema: "wire" });
		}
		let file = WireFile::deserialize(value)?;
		Ok(Self {
			commands: read_command_table(file.commands)?,
			return_commands: read_command_table(file.return_commands)?,
			special_items: file.special_items,
		})
	}
}

fn read_command_table(table: Map<String, Value>) -> Result<Vec<(String, Vec<RawMember>)>> {
	let mut out = Vec::with_capacity(table.len());
	for (name, value) in table {
		if name.starts_with('_') {
			continue;
		}
		let members = Vec::<RawMember>::deserialize(&value).map_err(|source| SchemaError::InvalidEntry { name: name.clone(), source })?;
		out.push((name, members));
	}
	Ok(out)
}

/// Object method a command was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMethod {
	/// Owning object.
	pub object: TypeId,
	/// Index into the object's sorted method list.
	pub method: usize,
}

/// One wire command record.
#[derive(Debug, Clone)]
pub struct Command {
	/// Command name.
	pub name: Name,
	/// Serialized members in order.
	pub members: Vec<RecordMember>,
	/// Some member may transitively hold an object handle.
	pub may_have_handle: bool,
	/// Originating method, for generated commands.
	pub derived: Option<DerivedMethod>,
}

impl Command {
	fn new(nodes: &[TypeNode], name: Name, members: Vec<RecordMember>, derived: Option<DerivedMethod>) -> Self {
		Self {
			may_have_handle: members_may_have_handle(nodes, &members),
			name,
			members,
			derived,
		}
	}

	/// Trailing returned-handle member, if any.
	pub fn result_member(&self) -> Option<&RecordMember> {
		self.members.last().filter(|member| member.is_return_value)
	}
}

/// Client-to-server and server-to-client command sets.
#[derive(Debug, Clone)]
pub struct WireModel {
	/// Client-to-server commands sorted by canonical name.
	pub commands: Vec<Command>,
	/// Server-to-client commands sorted by canonical name.
	pub return_commands: Vec<Command>,
	/// Special lists; the handwritten list includes client-side commands.
	pub special_items: SpecialItems,
}

impl WireModel {
	/// Generate commands from object methods and merge the handwritten tables.
	pub fn derive(api: &ApiModel, schema: &WireSchema) -> Result<Self> {
		let mut special_items = schema.special_items.clone();
		let client_side = special_items.client_side_commands.clone();
		special_items.client_handwritten_commands.extend(client_side);

		let handwritten: HashSet<&str> = special_items.client_handwritten_commands.iter().map(String::as_str).collect();
		let client_side: HashSet<&str> = special_items.client_side_commands.iter().map(String::as_str).collect();

		let categories = api.nodes.iter().map(TypeNode::category).collect::<Vec<_>>();
		let resolver = Resolver::new(&api.by_name, &categories);

		let mut commands = Vec::new();
		for &object_id in api.by_category(Category::Object) {
			let object = api.get(object_id);
			let Some(payload) = object.as_object() else {
				continue;
			};

			for (method_idx, method) in payload.methods.iter().enumerate() {
				let name = Name::concat(&[&object.name, &method.name]);
				let suffix = name.pascal_case();
				let returns = api.get(method.return_type);
				let is_object = returns.category() == Category::Object;
				let is_void = returns.name.canonical_case() == "void";

				if !(is_object || is_void) {
					if !handwritten.contains(suffix.as_str()) {
						return Err(SchemaError::UnrepresentableWireReturn {
							command: suffix,
							return_type: returns.name.get().to_owned(),
						});
					}
					trace!(command = %suffix, "skipping handwritten command");
					continue;
				}
				if client_side.contains(suffix.as_str()) {
					trace!(command = %suffix, "skipping client-side command");
					continue;
				}

				let mut members = Vec::with_capacity(method.arguments.len() + 2);
				members.push(RecordMember::value(Name::new("self"), object_id));
				members.extend(method.arguments.iter().cloned().map(shift_length_ref));

				if is_object {
					let handle = resolver.resolve("object handle", OBJECT_HANDLE, &suffix)?;
					let mut result = RecordMember::value(Name::new("result"), handle);
					result.is_return_value = true;
					result.handle_type = Some(method.return_type);
					members.push(result);
				}

				trace!(command = %suffix, members = members.len(), "generated command");
				let derived = DerivedMethod {
					object: object_id,
					method: method_idx,
				};
				commands.push(Command::new(&api.nodes, name, members, Some(derived)));
			}
		}
		let generated = commands.len();

		for (name, raw) in &schema.commands {
			let members = resolver.link_members(name, raw)?;
			commands.push(Command::new(&api.nodes, Name::new(name), members, None));
		}

		let mut return_commands = Vec::with_capacity(schema.return_commands.len());
		for (name, raw) in &schema.return_commands {
			let members = resolver.link_members(name, raw)?;
			return_commands.push(Command::new(&api.nodes, Name::new(name), members, None));
		}

		commands.sort_by_cached_key(|command| command.name.canonical_case());
		return_commands.sort_by_cached_key(|command| command.name.canonical_case());

		debug!(
			generated,
			commands = commands.len(),
			return_commands = return_commands.len(),
			"derived wire commands"
		);

		Ok(Self {
			commands,
			return_commands,
			special_items,
		})
	}

	/// Look up a client-to-server command by declared name.
	pub fn command(&self, name: &str) -> Option<&Command> {
		self.commands.iter().find(|command| command.name.get() == name)
	}
}

/// Arguments move one slot right once `self` is prepended.
fn shift_length_ref(mut member: RecordMember) -> RecordMember {
	if let Length::Member(idx) = member.length {
		member.length = Length::Member(idx + 1);
	}
	member
}
