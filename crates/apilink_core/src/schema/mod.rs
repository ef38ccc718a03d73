mod error;
mod fuzz;
mod helpers;
mod link;
mod model;
mod name;
mod raw;
mod source;
mod tags;
mod target;
mod toposort;
mod wire;

/// Error and result aliases.
pub use error::{Result, SchemaError};
/// Fuzz harness schema derivation.
pub use fuzz::{FuzzModel, FuzzSchema, length_member_indices};
/// Per-target naming helper set.
pub use helpers::RenderHelpers;
/// Linked object model types.
pub use model::{
	Annotation, ApiModel, BitmaskType, BitmaskValue, Category, ConstantDefinition, EnumType, EnumValue, Extensibility, FunctionDeclaration,
	Length, Metadata, Method, ObjectType, RecordMember, Signature, StructureType, TypeId, TypeKind, TypeNode, TypedefType,
};
/// Multi-word identifier model.
pub use name::Name;
/// Schema file loading.
pub use source::{Compression, decode_bytes, load_json};
/// Feature-tag filtering.
pub use tags::TagFilter;
/// Generation targets and per-run model cache.
pub use target::{GenerationContext, SchemaSet, Target, TargetModel};
/// Structure dependency ordering.
pub use toposort::sort_structures;
/// Wire protocol command derivation.
pub use wire::{Command, DerivedMethod, OBJECT_HANDLE, SpecialItems, WireModel, WireSchema};
