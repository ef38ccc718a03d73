use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors produced while loading, linking, and deriving schemas.
///
/// Every variant aborts the whole generation run.
#[derive(Debug, Error)]
pub enum SchemaError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Input was not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Top-level schema value had the wrong shape.
	#[error("{schema} schema root must be a JSON object")]
	InvalidSchemaRoot {
		/// Which schema was being read.
		schema: &'static str,
	},
	/// A schema record could not be read as its declared category.
	#[error("invalid schema entry {name}: {source}")]
	InvalidEntry {
		/// Declared entry name.
		name: String,
		/// Underlying decode failure.
		source: serde_json::Error,
	},
	/// A type reference names an undeclared or filtered-out item.
	#[error("unresolved {kind} reference {name:?} in {referrer}")]
	UnresolvedReference {
		/// Reference role (`member type`, `return type`, ...).
		kind: &'static str,
		/// Name that failed to resolve.
		name: String,
		/// Item holding the reference.
		referrer: String,
	},
	/// Two schema items share a name.
	#[error("duplicate item name {name:?}")]
	DuplicateItem {
		/// Colliding item name.
		name: String,
	},
	/// Two values of one enum share a number.
	#[error("duplicate value {value} in enum {enum_name}: {first} and {second}")]
	DuplicateEnumValue {
		/// Enum type name.
		enum_name: String,
		/// Shared numeric value.
		value: u64,
		/// First value name.
		first: String,
		/// Second value name.
		second: String,
	},
	/// Non-value member of a non-object type declared no length.
	#[error("missing length for {member} in {record}")]
	MissingLength {
		/// Owning record name.
		record: String,
		/// Member name.
		member: String,
	},
	/// Constant length was zero or negative.
	#[error("invalid length {length} for {member} in {record}")]
	InvalidLength {
		/// Owning record name.
		record: String,
		/// Member name.
		member: String,
		/// Declared length.
		length: i64,
	},
	/// Member annotation is not one of the known pointer forms.
	#[error("invalid annotation {annotation:?} for {member} in {record}")]
	InvalidAnnotation {
		/// Owning record name.
		record: String,
		/// Member name.
		member: String,
		/// Declared annotation text.
		annotation: String,
	},
	/// Structure extensibility markers are inconsistent.
	#[error("invalid structure {name}: {reason}")]
	InvalidStructureShape {
		/// Structure name.
		name: String,
		/// What is wrong with it.
		reason: &'static str,
	},
	/// A chain root is not a structure.
	#[error("chain root {root} of {structure} is not a structure")]
	InvalidChainRoot {
		/// Chained structure name.
		structure: String,
		/// Offending root name.
		root: String,
	},
	/// Constant value type is not a native type.
	#[error("constant {name} has non-native type {ty}")]
	ConstantTypeNotNative {
		/// Constant name.
		name: String,
		/// Resolved value type name.
		ty: String,
	},
	/// Method return cannot be expressed as a generated wire command.
	#[error("method {command} returns {return_type} and must be listed in client_handwritten_commands")]
	UnrepresentableWireReturn {
		/// PascalCase command suffix.
		command: String,
		/// Return type name.
		return_type: String,
	},
	/// Unknown generation target name.
	#[error("unknown target: {name}")]
	UnknownTarget {
		/// User-provided target string.
		name: String,
	},
	/// Unknown schema category name.
	#[error("unknown category: {name}")]
	UnknownCategory {
		/// User-provided category string.
		name: String,
	},
	/// A named item is not declared under the active tag configuration.
	#[error("no item named {name:?} under the {target} target")]
	UnknownItem {
		/// Requested item name.
		name: String,
		/// Target whose tag configuration was used.
		target: &'static str,
	},
	/// A target needs a schema that was not supplied.
	#[error("target {target} requires a {schema} schema")]
	MissingSchema {
		/// Requested target name.
		target: &'static str,
		/// Missing schema kind.
		schema: &'static str,
	},
}
