//! Serde shapes of schema records as written in the JSON files.

use serde::Deserialize;
use serde_json::Value;

use crate::schema::tags::Tagged;

/// One top-level API schema entry, keyed by `category`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "category")]
pub(crate) enum RawItem {
	#[serde(rename = "bitmask")]
	Bitmask(RawValues),
	#[serde(rename = "enum")]
	Enum(RawValues),
	#[serde(rename = "native")]
	Native(RawNative),
	#[serde(rename = "function pointer")]
	FunctionPointer(RawFunction),
	#[serde(rename = "typedef")]
	Typedef(RawTypedef),
	#[serde(rename = "object")]
	Object(RawObject),
	#[serde(rename = "structure")]
	Structure(RawStructure),
	#[serde(rename = "constant")]
	Constant(RawConstant),
	#[serde(rename = "function")]
	Function(RawFunction),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawValues {
	#[serde(default)]
	pub values: Vec<RawValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawValue {
	pub name: String,
	pub value: u64,
	#[serde(default = "default_true")]
	pub valid: bool,
	#[serde(default)]
	pub jsrepr: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawNative {
	#[serde(rename = "wire transparent", default = "default_true")]
	pub wire_transparent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawFunction {
	#[serde(default)]
	pub returns: Option<String>,
	#[serde(default)]
	pub args: Vec<RawMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawTypedef {
	#[serde(rename = "type")]
	pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawObject {
	#[serde(default)]
	pub methods: Vec<RawMethod>,
	#[serde(rename = "no autolock", default)]
	pub no_autolock: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMethod {
	pub name: String,
	#[serde(default)]
	pub returns: Option<String>,
	#[serde(default)]
	pub args: Vec<RawMember>,
	#[serde(rename = "no autolock", default)]
	pub no_autolock: bool,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStructure {
	#[serde(default)]
	pub members: Vec<RawMember>,
	#[serde(default)]
	pub chained: Option<String>,
	#[serde(default)]
	pub extensible: Option<String>,
	#[serde(rename = "chain roots", default)]
	pub chain_roots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawConstant {
	#[serde(rename = "type")]
	pub ty: String,
	pub value: Value,
}

/// Structure member, method argument, or wire command member.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMember {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: String,
	#[serde(default)]
	pub annotation: Option<String>,
	#[serde(default)]
	pub optional: bool,
	#[serde(default)]
	pub length: Option<RawLength>,
	#[serde(default)]
	pub default: Option<Value>,
	#[serde(default)]
	pub is_return_value: bool,
	#[serde(default)]
	pub skip_serialize: bool,
	#[serde(default)]
	pub handle_type: Option<String>,
	#[serde(default)]
	pub id_type: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
}

/// `length` is either a count or the name of a sibling member (or `strlen`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLength {
	Count(i64),
	Named(String),
}

impl RawMember {
	/// Untagged by-value member.
	pub fn by_value(name: &str, ty: &str) -> Self {
		Self {
			name: name.to_owned(),
			ty: ty.to_owned(),
			annotation: Some("value".to_owned()),
			optional: false,
			length: None,
			default: None,
			is_return_value: false,
			skip_serialize: false,
			handle_type: None,
			id_type: None,
			tags: None,
		}
	}
}

fn default_true() -> bool {
	true
}

impl Tagged for RawValue {
	fn tags(&self) -> Option<&[String]> {
		self.tags.as_deref()
	}
}

impl Tagged for RawMethod {
	fn tags(&self) -> Option<&[String]> {
		self.tags.as_deref()
	}
}

impl Tagged for RawMember {
	fn tags(&self) -> Option<&[String]> {
		self.tags.as_deref()
	}
}
