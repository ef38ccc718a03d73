use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::schema::{Name, TagFilter};

/// Stable arena index of one linked schema item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
	/// Arena slot of this id.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Closed set of schema item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
	/// Flag set with OR-able values.
	Bitmask,
	/// Enumerated value set.
	Enum,
	/// Target-language builtin type.
	Native,
	/// Callback signature.
	FunctionPointer,
	/// Alias of another type.
	Typedef,
	/// Reference-counted API object with methods.
	Object,
	/// Plain record type.
	Structure,
	/// Named constant value.
	Constant,
	/// Free function declaration.
	Function,
}

impl Category {
	/// Every category in listing order.
	pub const ALL: [Category; 9] = [
		Self::Bitmask,
		Self::Enum,
		Self::Native,
		Self::FunctionPointer,
		Self::Typedef,
		Self::Object,
		Self::Structure,
		Self::Constant,
		Self::Function,
	];

	/// Schema spelling of the category.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bitmask => "bitmask",
			Self::Enum => "enum",
			Self::Native => "native",
			Self::FunctionPointer => "function pointer",
			Self::Typedef => "typedef",
			Self::Object => "object",
			Self::Structure => "structure",
			Self::Constant => "constant",
			Self::Function => "function",
		}
	}

	/// Parse the schema spelling of a category.
	pub fn parse(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|item| item.as_str() == value)
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How a record member refers to its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
	/// Stored inline.
	Value,
	/// `T*`
	Pointer,
	/// `T const*`
	ConstPointer,
	/// `const T* const*`
	ConstPointerConstPointer,
}

impl Annotation {
	/// Schema spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Value => "value",
			Self::Pointer => "*",
			Self::ConstPointer => "const*",
			Self::ConstPointerConstPointer => "const*const*",
		}
	}

	/// Parse schema spelling.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"value" => Some(Self::Value),
			"*" => Some(Self::Pointer),
			"const*" => Some(Self::ConstPointer),
			"const*const*" => Some(Self::ConstPointerConstPointer),
			_ => None,
		}
	}
}

/// Element count of a non-value member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
	/// By-value member.
	None,
	/// Null-terminated string (`strlen`).
	NullTerminated,
	/// Fixed element count.
	Constant(u32),
	/// Count carried by the sibling member at this index.
	Member(usize),
}

/// Linked structure member, function argument, or command member.
#[derive(Debug, Clone)]
pub struct RecordMember {
	/// Member name.
	pub name: Name,
	/// Resolved member type.
	pub ty: TypeId,
	/// Pointer form.
	pub annotation: Annotation,
	/// Whether the member may be null/absent.
	pub optional: bool,
	/// Element count descriptor.
	pub length: Length,
	/// Declared default value, passed through unmodified.
	pub default_value: Option<Value>,
	/// Member carries a command's returned handle.
	pub is_return_value: bool,
	/// Member is regenerated on deserialization and never serialized.
	pub skip_serialize: bool,
	/// Concrete object type of an `ObjectHandle` member.
	pub handle_type: Option<TypeId>,
	/// Concrete object type of an `ObjectId` member.
	pub id_type: Option<TypeId>,
}

impl RecordMember {
	/// By-value member with default flags.
	pub fn value(name: Name, ty: TypeId) -> Self {
		Self {
			name,
			ty,
			annotation: Annotation::Value,
			optional: false,
			length: Length::None,
			default_value: None,
			is_return_value: false,
			skip_serialize: false,
			handle_type: None,
			id_type: None,
		}
	}
}

/// One enum value.
#[derive(Debug, Clone)]
pub struct EnumValue {
	/// Value name.
	pub name: Name,
	/// Numeric value.
	pub value: u64,
	/// Whether the value is accepted by validation.
	pub valid: bool,
	/// JavaScript spelling override.
	pub jsrepr: Option<String>,
}

/// Enum payload.
#[derive(Debug, Clone)]
pub struct EnumType {
	/// Included values in declaration order.
	pub values: Vec<EnumValue>,
	/// Values are exactly `0, 1, 2, ...`.
	pub contiguous_from_zero: bool,
}

/// One bitmask flag.
#[derive(Debug, Clone)]
pub struct BitmaskValue {
	/// Flag name.
	pub name: Name,
	/// Flag bits.
	pub value: u64,
}

/// Bitmask payload.
#[derive(Debug, Clone)]
pub struct BitmaskType {
	/// Included flags in declaration order.
	pub values: Vec<BitmaskValue>,
	/// OR of every included flag.
	pub full_mask: u64,
}

/// Return type and arguments shared by callbacks and free functions.
#[derive(Debug, Clone)]
pub struct Signature {
	/// Resolved return type.
	pub return_type: TypeId,
	/// Linked arguments.
	pub arguments: Vec<RecordMember>,
}

/// Free function payload.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
	/// Return type and arguments.
	pub signature: Signature,
	/// Excluded from C++ wrappers (synthesized helpers).
	pub no_cpp: bool,
}

/// Object method.
#[derive(Debug, Clone)]
pub struct Method {
	/// Method name.
	pub name: Name,
	/// Resolved return type.
	pub return_type: TypeId,
	/// Linked arguments.
	pub arguments: Vec<RecordMember>,
	/// Whether calls take the device lock.
	pub autolock: bool,
}

/// Object payload.
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
	/// Methods sorted by canonical name.
	pub methods: Vec<Method>,
}

/// Chaining role of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extensibility {
	/// Plain structure.
	None,
	/// Input extension attached to chain roots.
	ChainedIn,
	/// Output extension attached to chain roots.
	ChainedOut,
	/// Input structure accepting chained extensions.
	ExtensibleIn,
	/// Output structure accepting chained extensions.
	ExtensibleOut,
}

impl Extensibility {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::ChainedIn => "chained-in",
			Self::ChainedOut => "chained-out",
			Self::ExtensibleIn => "extensible-in",
			Self::ExtensibleOut => "extensible-out",
		}
	}

	/// Attaches to chain roots.
	pub fn is_chained(self) -> bool {
		matches!(self, Self::ChainedIn | Self::ChainedOut)
	}

	/// Accepts extensions.
	pub fn is_extensible(self) -> bool {
		matches!(self, Self::ExtensibleIn | Self::ExtensibleOut)
	}

	/// Filled in by the implementation rather than the caller.
	pub fn is_output(self) -> bool {
		matches!(self, Self::ChainedOut | Self::ExtensibleOut)
	}
}

/// Structure payload.
#[derive(Debug, Clone)]
pub struct StructureType {
	/// Linked members in declaration order.
	pub members: Vec<RecordMember>,
	/// Chaining role.
	pub extensibility: Extensibility,
	/// Structures this one may be chained onto.
	pub chain_roots: Vec<TypeId>,
	/// Chained structures declaring this one as a root.
	pub extensions: Vec<TypeId>,
}

impl StructureType {
	/// Output structure owning pointer members needs a generated free function.
	pub fn has_free_members_function(&self) -> bool {
		self.extensibility.is_output() && self.members.iter().any(|member| member.annotation != Annotation::Value)
	}
}

/// Typedef payload.
#[derive(Debug, Clone, Copy)]
pub struct TypedefType {
	/// Aliased type.
	pub target: TypeId,
}

/// Constant payload.
#[derive(Debug, Clone)]
pub struct ConstantDefinition {
	/// Native value type.
	pub ty: TypeId,
	/// Declared value, passed through unmodified.
	pub value: Value,
}

/// Category-specific payload of a linked node.
#[derive(Debug, Clone)]
pub enum TypeKind {
	/// Bitmask flags.
	Bitmask(BitmaskType),
	/// Enum values.
	Enum(EnumType),
	/// Builtin type.
	Native,
	/// Callback signature.
	FunctionPointer(Signature),
	/// Type alias.
	Typedef(TypedefType),
	/// API object.
	Object(ObjectType),
	/// Record type.
	Structure(StructureType),
	/// Named constant.
	Constant(ConstantDefinition),
	/// Free function.
	Function(FunctionDeclaration),
}

/// One linked schema item.
#[derive(Debug, Clone)]
pub struct TypeNode {
	/// Declared name.
	pub name: Name,
	/// Category payload.
	pub kind: TypeKind,
	/// May transitively hold an object handle.
	pub may_have_handle: bool,
	/// Serializable by copying its bytes.
	pub wire_transparent: bool,
}

impl TypeNode {
	/// Category of the payload.
	pub fn category(&self) -> Category {
		match self.kind {
			TypeKind::Bitmask(_) => Category::Bitmask,
			TypeKind::Enum(_) => Category::Enum,
			TypeKind::Native => Category::Native,
			TypeKind::FunctionPointer(_) => Category::FunctionPointer,
			TypeKind::Typedef(_) => Category::Typedef,
			TypeKind::Object(_) => Category::Object,
			TypeKind::Structure(_) => Category::Structure,
			TypeKind::Constant(_) => Category::Constant,
			TypeKind::Function(_) => Category::Function,
		}
	}

	/// Structure payload, if any.
	pub fn as_structure(&self) -> Option<&StructureType> {
		match &self.kind {
			TypeKind::Structure(item) => Some(item),
			_ => None,
		}
	}

	/// Object payload, if any.
	pub fn as_object(&self) -> Option<&ObjectType> {
		match &self.kind {
			TypeKind::Object(item) => Some(item),
			_ => None,
		}
	}

	/// Enum payload, if any.
	pub fn as_enum(&self) -> Option<&EnumType> {
		match &self.kind {
			TypeKind::Enum(item) => Some(item),
			_ => None,
		}
	}

	/// Bitmask payload, if any.
	pub fn as_bitmask(&self) -> Option<&BitmaskType> {
		match &self.kind {
			TypeKind::Bitmask(item) => Some(item),
			_ => None,
		}
	}

	/// Signature of a function or function pointer.
	pub fn signature(&self) -> Option<&Signature> {
		match &self.kind {
			TypeKind::FunctionPointer(item) => Some(item),
			TypeKind::Function(item) => Some(&item.signature),
			_ => None,
		}
	}
}

/// Contents of the `_metadata` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
	/// API name (`WebGPU`).
	pub api: String,
	/// C++ namespace (`wgpu`).
	pub namespace: String,
	/// C symbol prefix; defaults to the upper-cased namespace.
	#[serde(default)]
	pub c_prefix: Option<String>,
	/// Proc table file prefix.
	pub proc_table_prefix: String,
	/// Implementation directory, may be empty.
	#[serde(default)]
	pub impl_dir: String,
	/// Native implementation namespace (space separated).
	pub native_namespace: String,
	/// Year stamped into generated headers.
	#[serde(default)]
	pub copyright_year: Option<Value>,
}

impl Metadata {
	/// Effective C symbol prefix.
	pub fn c_prefix(&self) -> String {
		self.c_prefix.clone().unwrap_or_else(|| self.namespace.to_uppercase())
	}
}

/// Fully linked API object model for one tag configuration.
#[derive(Debug)]
pub struct ApiModel {
	/// Parsed `_metadata`, when present.
	pub metadata: Option<Metadata>,
	/// Tag configuration this model was built with.
	pub filter: TagFilter,
	pub(crate) nodes: Vec<TypeNode>,
	pub(crate) by_name: HashMap<String, TypeId>,
	pub(crate) by_category: BTreeMap<Category, Vec<TypeId>>,
}

impl ApiModel {
	/// Node for an id produced by this model.
	pub fn get(&self, id: TypeId) -> &TypeNode {
		&self.nodes[id.index()]
	}

	/// Resolve a declared name.
	pub fn lookup(&self, name: &str) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	/// Resolve a declared name to its node.
	pub fn node(&self, name: &str) -> Option<&TypeNode> {
		self.lookup(name).map(|id| self.get(id))
	}

	/// Every node in declaration order, including synthesized ones.
	pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
		self.nodes.iter().enumerate().map(|(idx, node)| (TypeId(idx as u32), node))
	}

	/// Number of linked items.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether nothing survived filtering.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Ordered ids of one category; structures are dependency ordered, the rest
	/// sorted by canonical name.
	pub fn by_category(&self, category: Category) -> &[TypeId] {
		self.by_category.get(&category).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Object methods plus the implicit `reference` and `release`.
	pub fn c_methods(&self, object: TypeId) -> Vec<Method> {
		let mut methods = self.get(object).as_object().map(|item| item.methods.clone()).unwrap_or_default();
		if let Some(void) = self.lookup("void") {
			for name in ["reference", "release"] {
				methods.push(Method {
					name: Name::new(name),
					return_type: void,
					arguments: Vec::new(),
					autolock: false,
				});
			}
		}
		methods
	}

	/// `(object, method)` pairs of every object ordered by `ObjectMethod` suffix.
	pub fn c_methods_sorted_by_name(&self) -> Vec<(TypeId, Method)> {
		let mut items = Vec::new();
		for &object in self.by_category(Category::Object) {
			let object_name = self.get(object).name.pascal_case();
			for method in self.c_methods(object) {
				let suffix = format!("{object_name}{}", method.name.pascal_case());
				items.push((suffix, object, method));
			}
		}
		items.sort_by(|a, b| a.0.cmp(&b.0));
		items.into_iter().map(|(_, object, method)| (object, method)).collect()
	}
}
