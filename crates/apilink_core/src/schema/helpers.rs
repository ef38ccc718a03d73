//! Naming helpers handed to the renderers of each target.

use crate::schema::{Annotation, ApiModel, Category, EnumValue, Name, RecordMember, TypeNode};

/// Per-target naming helper set.
///
/// Holds the C symbol prefix and C++ namespace so every helper can be called
/// without extra context.
#[derive(Debug, Clone, Default)]
pub struct RenderHelpers {
	/// C symbol prefix (`WGPU`).
	pub c_prefix: String,
	/// C++ namespace (`wgpu`).
	pub namespace: String,
}

impl RenderHelpers {
	/// Helper set with explicit prefix and namespace.
	pub fn new(c_prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			c_prefix: c_prefix.into(),
			namespace: namespace.into(),
		}
	}

	/// Helper set configured from a model's `_metadata`.
	pub fn for_model(api: &ApiModel) -> Self {
		match &api.metadata {
			Some(metadata) => Self::new(metadata.c_prefix(), metadata.namespace.clone()),
			None => Self::default(),
		}
	}

	/// `WGPUBufferDescriptor`, or the bare token for natives other than `bool`.
	pub fn as_c_type(&self, name: &Name) -> String {
		if name.is_native() && name.get() != "bool" {
			name.concat_case()
		} else {
			format!("{}{}", self.c_prefix, name.pascal_case())
		}
	}

	/// C type of a node; bitmasks use their `Flags` typedef.
	pub fn as_c_return_type(&self, node: &TypeNode) -> String {
		match node.category() {
			Category::Bitmask => format!("{}Flags", self.as_c_type(&node.name)),
			_ => self.as_c_type(&node.name),
		}
	}

	/// `BufferDescriptor`, or the bare token for natives other than `bool`.
	pub fn as_cpp_type(name: &Name) -> String {
		if name.is_native() && name.get() != "bool" {
			name.concat_case()
		} else {
			name.pascal_case()
		}
	}

	/// `WGPUPowerPreference_LowPower`
	pub fn as_c_enum(&self, type_name: &Name, value_name: &Name) -> String {
		debug_assert!(!type_name.is_native() && !value_name.is_native());
		format!("{}{}_{}", self.c_prefix, type_name.pascal_case(), value_name.pascal_case())
	}

	/// C++ enum member; names starting with a digit get an `e` prefix.
	pub fn as_cpp_enum(value_name: &Name) -> String {
		debug_assert!(!value_name.is_native());
		if value_name.concat_case().starts_with(|c: char| c.is_ascii_digit()) {
			format!("e{}", value_name.pascal_case())
		} else {
			value_name.pascal_case()
		}
	}

	/// `wgpuDeviceCreateBuffer`, or `wgpuCreateInstance` without a type.
	pub fn as_c_method(&self, type_name: Option<&Name>, method_name: &Name) -> String {
		let mut out = self.c_prefix.to_lowercase();
		if let Some(type_name) = type_name {
			out.push_str(&type_name.pascal_case());
		}
		out.push_str(&method_name.pascal_case());
		out
	}

	/// `WGPUProcDeviceCreateBuffer`
	pub fn as_c_proc(&self, type_name: Option<&Name>, method_name: &Name) -> String {
		let mut out = format!("{}Proc", self.c_prefix);
		if let Some(type_name) = type_name {
			out.push_str(&type_name.pascal_case());
		}
		out.push_str(&method_name.pascal_case());
		out
	}

	/// `DeviceCreateBuffer`
	pub fn as_method_suffix(type_name: &Name, method_name: &Name) -> String {
		format!("{}{}", type_name.pascal_case(), method_name.pascal_case())
	}

	/// `bufferDescriptorLabel` from `buffer descriptor` + `label`.
	pub fn as_var_name(names: &[&Name]) -> String {
		let mut out = String::new();
		for (idx, name) in names.iter().enumerate() {
			if idx == 0 {
				out.push_str(&name.camel_case());
			} else {
				out.push_str(&name.pascal_case());
			}
		}
		out
	}

	/// Declarator for `name` of type `ty` with the member's pointer form.
	pub fn decorate(name: &str, ty: &str, annotation: Annotation, make_const: bool) -> String {
		let maybe_const = if make_const { " const " } else { " " };
		match annotation {
			Annotation::Value => format!("{ty}{maybe_const}{name}"),
			Annotation::Pointer => format!("{ty} *{maybe_const}{name}"),
			Annotation::ConstPointer => format!("{ty} const *{maybe_const}{name}"),
			Annotation::ConstPointerConstPointer => format!("const {ty}* const *{maybe_const}{name}"),
		}
	}

	/// Member declarator using its C type.
	pub fn as_annotated_c_type(&self, api: &ApiModel, member: &RecordMember, make_const: bool) -> String {
		let ty = self.as_c_return_type(api.get(member.ty));
		Self::decorate(&Self::as_var_name(&[&member.name]), &ty, member.annotation, make_const)
	}

	/// Member declarator using its C++ type.
	pub fn as_annotated_cpp_type(api: &ApiModel, member: &RecordMember, make_const: bool) -> String {
		let ty = Self::as_cpp_type(&api.get(member.ty).name);
		Self::decorate(&Self::as_var_name(&[&member.name]), &ty, member.annotation, make_const)
	}

	/// Quoted JavaScript enum string, honoring `jsrepr`.
	pub fn as_js_enum_value(value: &EnumValue) -> String {
		match &value.jsrepr {
			Some(repr) => repr.clone(),
			None => format!("'{}'", value.name.kebab_case()),
		}
	}

	/// Type used by the native frontend implementation.
	pub fn as_frontend_type(&self, node: &TypeNode) -> String {
		match node.category() {
			Category::Object => format!("{}Base*", node.name.pascal_case()),
			Category::Bitmask | Category::Enum => format!("{}::{}", self.namespace, node.name.pascal_case()),
			Category::Native if node.name.get() == "bool" => format!("{}::{}", self.namespace, node.name.pascal_case()),
			Category::Structure => Self::as_cpp_type(&node.name),
			_ => self.as_c_type(&node.name),
		}
	}

	/// Type used by wire client and server code.
	pub fn as_wire_type(&self, node: &TypeNode) -> String {
		match node.category() {
			Category::Object => format!("{}*", node.name.pascal_case()),
			Category::Bitmask | Category::Enum | Category::Structure => format!("{}{}", self.c_prefix, node.name.pascal_case()),
			_ => Self::as_cpp_type(&node.name),
		}
	}

	/// Protobuf field type for the LPM harness; `None` for an unmapped native.
	pub fn as_protobuf_type_lpm(node: &TypeNode) -> Option<String> {
		if !node.name.is_native() {
			return Some(node.name.pascal_case());
		}
		let mapped = match node.name.get() {
			"bool" => "bool",
			"float" => "float",
			"double" => "double",
			"int8_t" | "int16_t" | "int32_t" => "int32",
			"int64_t" => "int64",
			"uint8_t" | "uint16_t" | "uint32_t" => "uint32",
			"uint64_t" | "size_t" => "uint64",
			_ => return None,
		};
		Some(mapped.to_owned())
	}

	/// Protobuf field name; `descriptor` is reserved by the mutator.
	pub fn as_protobuf_name_lpm(names: &[&Name]) -> String {
		if names.first().is_some_and(|name| name.concat_case() == "descriptor") {
			return "desc".to_owned();
		}
		Self::as_var_name(names)
	}

	/// Protobuf accessor name used from C++ (`membera`).
	pub fn as_protobuf_member_name_lpm(names: &[&Name]) -> String {
		if names.first().is_some_and(|name| name.concat_case() == "descriptor") {
			return "desc".to_owned();
		}
		names.iter().map(|name| name.concat_case().to_lowercase()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::RenderHelpers;
	use crate::schema::{Annotation, EnumValue, Name};

	#[test]
	fn c_names_use_prefix() {
		let helpers = RenderHelpers::new("WGPU", "wgpu");
		let device = Name::new("device");
		let create = Name::new("create buffer");
		assert_eq!(helpers.as_c_type(&Name::new("buffer descriptor")), "WGPUBufferDescriptor");
		assert_eq!(helpers.as_c_type(&Name::native("uint32_t")), "uint32_t");
		assert_eq!(helpers.as_c_type(&Name::native("bool")), "WGPUBool");
		assert_eq!(helpers.as_c_method(Some(&device), &create), "wgpuDeviceCreateBuffer");
		assert_eq!(helpers.as_c_proc(Some(&device), &create), "WGPUProcDeviceCreateBuffer");
		assert_eq!(helpers.as_c_enum(&Name::new("power preference"), &Name::new("low power")), "WGPUPowerPreference_LowPower");
	}

	#[test]
	fn cpp_enum_prefixes_leading_digit() {
		assert_eq!(RenderHelpers::as_cpp_enum(&Name::new("2D")), "e2D");
		assert_eq!(RenderHelpers::as_cpp_enum(&Name::new("high performance")), "HighPerformance");
	}

	#[test]
	fn decorate_covers_every_annotation() {
		assert_eq!(RenderHelpers::decorate("count", "uint32_t", Annotation::Value, false), "uint32_t count");
		assert_eq!(RenderHelpers::decorate("data", "void", Annotation::Pointer, false), "void * data");
		assert_eq!(RenderHelpers::decorate("label", "char", Annotation::ConstPointer, true), "char const * const label");
		assert_eq!(RenderHelpers::decorate("names", "char", Annotation::ConstPointerConstPointer, false), "const char* const * names");
	}

	#[test]
	fn js_enum_value_prefers_override() {
		let plain = EnumValue {
			name: Name::new("rgba8 unorm"),
			value: 0,
			valid: true,
			jsrepr: None,
		};
		let custom = EnumValue {
			jsrepr: Some("undefined".to_owned()),
			..plain.clone()
		};
		assert_eq!(RenderHelpers::as_js_enum_value(&plain), "'rgba8unorm'");
		assert_eq!(RenderHelpers::as_js_enum_value(&custom), "undefined");
	}

	#[test]
	fn protobuf_names_avoid_reserved_descriptor() {
		let descriptor = Name::new("descriptor");
		let label = Name::new("label");
		assert_eq!(RenderHelpers::as_protobuf_name_lpm(&[&descriptor]), "desc");
		assert_eq!(RenderHelpers::as_protobuf_name_lpm(&[&Name::new("buffer size")]), "bufferSize");
		assert_eq!(RenderHelpers::as_protobuf_member_name_lpm(&[&Name::new("member a"), &label]), "memberalabel");
	}
}
