use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::raw::{RawConstant, RawFunction, RawItem, RawLength, RawMember, RawObject, RawStructure, RawValues};
use crate::schema::tags::retain_enabled;
use crate::schema::toposort::sort_structures;
use crate::schema::{
	Annotation, ApiModel, BitmaskType, BitmaskValue, Category, ConstantDefinition, EnumType, EnumValue, Extensibility, FunctionDeclaration,
	Length, Metadata, Method, Name, ObjectType, RecordMember, Result, SchemaError, Signature, StructureType, TagFilter, TypeId, TypeKind,
	TypeNode, TypedefType,
};

const METADATA_KEY: &str = "_metadata";

/// Declared entry waiting for its references to be linked.
struct Pending {
	name: String,
	raw: RawItem,
	synthesized: bool,
}

impl ApiModel {
	/// Parse and link an API schema under one tag configuration.
	pub fn parse(schema: &Value, filter: &TagFilter) -> Result<Self> {
		let root = schema.as_object().ok_or(SchemaError::InvalidSchemaRoot { schema: "api" })?;
		Self::parse_map(root, filter)
	}

	/// Parse and link an already-unwrapped top-level schema object.
	pub fn parse_map(root: &Map<String, Value>, filter: &TagFilter) -> Result<Self> {
		let metadata = match root.get(METADATA_KEY) {
			Some(value) => Some(Metadata::deserialize(value).map_err(|source| SchemaError::InvalidEntry {
				name: METADATA_KEY.to_owned(),
				source,
			})?),
			None => None,
		};

		let mut pending = collect_entries(root, filter)?;
		pending.extend(free_members_functions(&pending));

		let mut by_name = HashMap::with_capacity(pending.len());
		let mut categories = Vec::with_capacity(pending.len());
		for (idx, item) in pending.iter().enumerate() {
			if by_name.insert(item.name.clone(), TypeId(idx as u32)).is_some() {
				return Err(SchemaError::DuplicateItem { name: item.name.clone() });
			}
			categories.push(raw_category(&item.raw));
		}
		debug!(entries = pending.len(), "collected schema entries");

		let resolver = Resolver::new(&by_name, &categories);
		let mut nodes = Vec::with_capacity(pending.len());
		for item in pending {
			nodes.push(resolver.build_node(item)?);
		}

		link_extensions(&mut nodes);

		let mut by_category: BTreeMap<Category, Vec<TypeId>> = Category::ALL.into_iter().map(|category| (category, Vec::new())).collect();
		for (idx, node) in nodes.iter().enumerate() {
			by_category.entry(node.category()).or_default().push(TypeId(idx as u32));
		}
		for ids in by_category.values_mut() {
			ids.sort_by_cached_key(|id| nodes[id.index()].name.canonical_case());
		}

		let structures = sort_structures(&nodes, by_category.get(&Category::Structure).map(Vec::as_slice).unwrap_or(&[]));
		for &id in &structures {
			update_structure_flags(&mut nodes, id);
		}
		by_category.insert(Category::Structure, structures);

		for (category, ids) in &by_category {
			debug!(category = category.as_str(), count = ids.len(), "linked category");
		}

		Ok(Self {
			metadata,
			filter: filter.clone(),
			nodes,
			by_name,
			by_category,
		})
	}
}

fn collect_entries(root: &Map<String, Value>, filter: &TagFilter) -> Result<Vec<Pending>> {
	let mut pending = Vec::new();
	for (name, value) in root {
		if name.starts_with('_') {
			continue;
		}
		let included = filter
			.includes_value(value)
			.map_err(|source| SchemaError::InvalidEntry { name: name.clone(), source })?;
		if !included {
			continue;
		}
		let raw = RawItem::deserialize(value).map_err(|source| SchemaError::InvalidEntry { name: name.clone(), source })?;
		pending.push(Pending {
			name: name.clone(),
			raw: filter_nested(raw, filter),
			synthesized: false,
		});
	}
	Ok(pending)
}

fn filter_nested(raw: RawItem, filter: &TagFilter) -> RawItem {
	let filter_function = |item: RawFunction| RawFunction {
		returns: item.returns,
		args: retain_enabled(filter, item.args),
	};

	match raw {
		RawItem::Bitmask(item) => RawItem::Bitmask(RawValues {
			values: retain_enabled(filter, item.values),
		}),
		RawItem::Enum(item) => RawItem::Enum(RawValues {
			values: retain_enabled(filter, item.values),
		}),
		RawItem::Object(item) => {
			let methods = retain_enabled(filter, item.methods)
				.into_iter()
				.map(|mut method| {
					method.args = retain_enabled(filter, method.args);
					method
				})
				.collect();
			RawItem::Object(RawObject {
				methods,
				no_autolock: item.no_autolock,
			})
		}
		RawItem::Structure(item) => RawItem::Structure(RawStructure {
			members: retain_enabled(filter, item.members),
			..item
		}),
		RawItem::FunctionPointer(item) => RawItem::FunctionPointer(filter_function(item)),
		RawItem::Function(item) => RawItem::Function(filter_function(item)),
		other => other,
	}
}

/// Output structures with pointer members get a `<name> free members` function.
fn free_members_functions(pending: &[Pending]) -> Vec<Pending> {
	let mut out = Vec::new();
	for item in pending {
		let RawItem::Structure(structure) = &item.raw else {
			continue;
		};
		let output = structure.chained.as_deref() == Some("out") || structure.extensible.as_deref() == Some("out");
		let has_pointer = structure
			.members
			.iter()
			.any(|member| member.annotation.as_deref().is_some_and(|annotation| annotation != "value"));
		if output && has_pointer {
			out.push(Pending {
				name: format!("{} free members", item.name),
				raw: RawItem::Function(RawFunction {
					returns: Some("void".to_owned()),
					args: vec![RawMember::by_value("value", &item.name)],
				}),
				synthesized: true,
			});
		}
	}
	out
}

fn raw_category(raw: &RawItem) -> Category {
	match raw {
		RawItem::Bitmask(_) => Category::Bitmask,
		RawItem::Enum(_) => Category::Enum,
		RawItem::Native(_) => Category::Native,
		RawItem::FunctionPointer(_) => Category::FunctionPointer,
		RawItem::Typedef(_) => Category::Typedef,
		RawItem::Object(_) => Category::Object,
		RawItem::Structure(_) => Category::Structure,
		RawItem::Constant(_) => Category::Constant,
		RawItem::Function(_) => Category::Function,
	}
}

/// Name lookup over a fixed set of declared items.
pub(crate) struct Resolver<'a> {
	by_name: &'a HashMap<String, TypeId>,
	categories: &'a [Category],
}

impl<'a> Resolver<'a> {
	pub(crate) fn new(by_name: &'a HashMap<String, TypeId>, categories: &'a [Category]) -> Self {
		Self { by_name, categories }
	}

	pub(crate) fn resolve(&self, kind: &'static str, name: &str, referrer: &str) -> Result<TypeId> {
		self.by_name.get(name).copied().ok_or_else(|| SchemaError::UnresolvedReference {
			kind,
			name: name.to_owned(),
			referrer: referrer.to_owned(),
		})
	}

	pub(crate) fn category(&self, id: TypeId) -> Category {
		self.categories[id.index()]
	}

	fn build_node(&self, item: Pending) -> Result<TypeNode> {
		let Pending { name, raw, synthesized } = item;
		let mut wire_transparent = false;
		let kind = match raw {
			RawItem::Bitmask(values) => {
				wire_transparent = true;
				TypeKind::Bitmask(build_bitmask(values))
			}
			RawItem::Enum(values) => {
				wire_transparent = true;
				TypeKind::Enum(build_enum(&name, values)?)
			}
			RawItem::Native(native) => {
				wire_transparent = native.wire_transparent;
				TypeKind::Native
			}
			RawItem::FunctionPointer(function) => TypeKind::FunctionPointer(self.link_signature(&name, function)?),
			RawItem::Typedef(typedef) => TypeKind::Typedef(TypedefType {
				target: self.resolve("typedef target", &typedef.target, &name)?,
			}),
			RawItem::Object(object) => TypeKind::Object(self.link_object(&name, object)?),
			RawItem::Structure(structure) => TypeKind::Structure(self.link_structure(&name, structure)?),
			RawItem::Constant(constant) => TypeKind::Constant(self.link_constant(&name, constant)?),
			RawItem::Function(function) => TypeKind::Function(FunctionDeclaration {
				signature: self.link_signature(&name, function)?,
				no_cpp: synthesized,
			}),
		};

		let may_have_handle = matches!(kind, TypeKind::Object(_));
		let name = match kind {
			TypeKind::Native => Name::native(&name),
			_ => Name::new(&name),
		};
		Ok(TypeNode {
			name,
			kind,
			may_have_handle,
			wire_transparent,
		})
	}

	fn link_signature(&self, name: &str, function: RawFunction) -> Result<Signature> {
		let returns = function.returns.as_deref().unwrap_or("void");
		Ok(Signature {
			return_type: self.resolve("return type", returns, name)?,
			arguments: self.link_members(name, &function.args)?,
		})
	}

	fn link_object(&self, name: &str, object: RawObject) -> Result<ObjectType> {
		let object_autolock = !object.no_autolock;
		let mut methods = Vec::with_capacity(object.methods.len());
		for method in object.methods {
			let referrer = format!("{name}.{}", method.name);
			let returns = method.returns.as_deref().unwrap_or("void");
			methods.push(Method {
				return_type: self.resolve("return type", returns, &referrer)?,
				arguments: self.link_members(&referrer, &method.args)?,
				autolock: object_autolock && !method.no_autolock,
				name: Name::new(&method.name),
			});
		}
		methods.sort_by_cached_key(|method| method.name.canonical_case());
		Ok(ObjectType { methods })
	}

	fn link_structure(&self, name: &str, structure: RawStructure) -> Result<StructureType> {
		let extensibility = parse_extensibility(name, &structure)?;
		let members = self.link_members(name, &structure.members)?;

		let mut chain_roots = Vec::new();
		for root in structure.chain_roots.iter().flatten() {
			let id = self.resolve("chain root", root, name)?;
			if self.category(id) != Category::Structure {
				return Err(SchemaError::InvalidChainRoot {
					structure: name.to_owned(),
					root: root.clone(),
				});
			}
			chain_roots.push(id);
		}

		Ok(StructureType {
			members,
			extensibility,
			chain_roots,
			extensions: Vec::new(),
		})
	}

	fn link_constant(&self, name: &str, constant: RawConstant) -> Result<ConstantDefinition> {
		let ty = self.resolve("constant type", &constant.ty, name)?;
		if self.category(ty) != Category::Native {
			return Err(SchemaError::ConstantTypeNotNative {
				name: name.to_owned(),
				ty: constant.ty,
			});
		}
		Ok(ConstantDefinition { ty, value: constant.value })
	}

	/// Link structure members, arguments, or command members of `record`.
	pub(crate) fn link_members(&self, record: &str, raw: &[RawMember]) -> Result<Vec<RecordMember>> {
		let mut members = Vec::with_capacity(raw.len());
		for item in raw {
			let referrer = format!("{record}.{}", item.name);
			let annotation = match item.annotation.as_deref() {
				None => Annotation::Value,
				Some(text) => Annotation::parse(text).ok_or_else(|| SchemaError::InvalidAnnotation {
					record: record.to_owned(),
					member: item.name.clone(),
					annotation: text.to_owned(),
				})?,
			};
			let handle_type = item
				.handle_type
				.as_deref()
				.map(|target| self.resolve("handle type", target, &referrer))
				.transpose()?;
			let id_type = item.id_type.as_deref().map(|target| self.resolve("id type", target, &referrer)).transpose()?;

			members.push(RecordMember {
				name: Name::new(&item.name),
				ty: self.resolve("member type", &item.ty, &referrer)?,
				annotation,
				optional: item.optional,
				length: Length::None,
				default_value: item.default.clone(),
				is_return_value: item.is_return_value,
				skip_serialize: item.skip_serialize,
				handle_type,
				id_type,
			});
		}

		for (idx, item) in raw.iter().enumerate() {
			if members[idx].annotation == Annotation::Value {
				continue;
			}
			let length = self.member_length(record, item, members[idx].ty, &members)?;
			members[idx].length = length;
		}

		Ok(members)
	}

	fn member_length(&self, record: &str, item: &RawMember, ty: TypeId, siblings: &[RecordMember]) -> Result<Length> {
		match &item.length {
			None if self.category(ty) == Category::Object => Ok(Length::Constant(1)),
			None => Err(SchemaError::MissingLength {
				record: record.to_owned(),
				member: item.name.clone(),
			}),
			Some(RawLength::Count(count)) => match u32::try_from(*count) {
				Ok(count) if count > 0 => Ok(Length::Constant(count)),
				_ => Err(SchemaError::InvalidLength {
					record: record.to_owned(),
					member: item.name.clone(),
					length: *count,
				}),
			},
			Some(RawLength::Named(name)) if name == "strlen" => Ok(Length::NullTerminated),
			Some(RawLength::Named(name)) => {
				let key = Name::new(name).canonical_case();
				siblings
					.iter()
					.position(|member| member.name.canonical_case() == key)
					.map(Length::Member)
					.ok_or_else(|| SchemaError::UnresolvedReference {
						kind: "length member",
						name: name.clone(),
						referrer: format!("{record}.{}", item.name),
					})
			}
		}
	}
}

fn build_enum(name: &str, raw: RawValues) -> Result<EnumType> {
	let mut seen: HashMap<u64, String> = HashMap::new();
	let mut values = Vec::with_capacity(raw.values.len());
	let mut contiguous_from_zero = true;
	let mut expected = Some(0_u64);

	for item in raw.values {
		if expected != Some(item.value) {
			contiguous_from_zero = false;
		}
		expected = item.value.checked_add(1);

		if let Some(first) = seen.get(&item.value) {
			return Err(SchemaError::DuplicateEnumValue {
				enum_name: name.to_owned(),
				value: item.value,
				first: first.clone(),
				second: item.name,
			});
		}
		seen.insert(item.value, item.name.clone());

		values.push(EnumValue {
			name: Name::new(&item.name),
			value: item.value,
			valid: item.valid,
			jsrepr: item.jsrepr,
		});
	}

	Ok(EnumType {
		values,
		contiguous_from_zero,
	})
}

fn build_bitmask(raw: RawValues) -> BitmaskType {
	let values = raw
		.values
		.into_iter()
		.map(|item| BitmaskValue {
			name: Name::new(&item.name),
			value: item.value,
		})
		.collect::<Vec<_>>();
	let full_mask = values.iter().fold(0, |mask, item| mask | item.value);
	BitmaskType { values, full_mask }
}

fn parse_extensibility(name: &str, structure: &RawStructure) -> Result<Extensibility> {
	let shape_error = |reason| SchemaError::InvalidStructureShape {
		name: name.to_owned(),
		reason,
	};

	let extensibility = match (structure.chained.as_deref(), structure.extensible.as_deref()) {
		(Some(_), Some(_)) => return Err(shape_error("both chained and extensible")),
		(Some("in"), None) => Extensibility::ChainedIn,
		(Some("out"), None) => Extensibility::ChainedOut,
		(Some(_), None) => return Err(shape_error("chained must be \"in\" or \"out\"")),
		(None, Some("in")) => Extensibility::ExtensibleIn,
		(None, Some("out")) => Extensibility::ExtensibleOut,
		(None, Some(_)) => return Err(shape_error("extensible must be \"in\" or \"out\"")),
		(None, None) => Extensibility::None,
	};

	if extensibility.is_chained() && structure.chain_roots.is_none() {
		return Err(shape_error("chained structure without chain roots"));
	}
	Ok(extensibility)
}

/// Record every chained structure on its roots' `extensions` lists.
fn link_extensions(nodes: &mut [TypeNode]) {
	let mut edges = Vec::new();
	for (idx, node) in nodes.iter().enumerate() {
		if let Some(structure) = node.as_structure() {
			for &root in &structure.chain_roots {
				edges.push((root, TypeId(idx as u32)));
			}
		}
	}

	for (root, extension) in edges {
		if let TypeKind::Structure(structure) = &mut nodes[root.index()].kind {
			structure.extensions.push(extension);
		}
	}
}

/// Whether any member's type may hold an object handle.
pub(crate) fn members_may_have_handle(nodes: &[TypeNode], members: &[RecordMember]) -> bool {
	members.iter().any(|member| nodes[member.ty.index()].may_have_handle)
}

/// Requires every structure member type to be updated first.
fn update_structure_flags(nodes: &mut [TypeNode], id: TypeId) {
	let Some(structure) = nodes[id.index()].as_structure() else {
		return;
	};

	let may_have_handle =
		members_may_have_handle(nodes, &structure.members) || structure.extensibility.is_chained() || structure.extensibility.is_extensible();
	let wire_transparent = !may_have_handle
		&& structure
			.members
			.iter()
			.all(|member| member.annotation == Annotation::Value && nodes[member.ty.index()].wire_transparent);

	let node = &mut nodes[id.index()];
	node.may_have_handle = may_have_handle;
	node.wire_transparent = wire_transparent;
}
