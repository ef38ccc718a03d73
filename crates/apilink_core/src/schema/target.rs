use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::schema::{ApiModel, FuzzModel, FuzzSchema, Result, SchemaError, TagFilter, WireModel, WireSchema, load_json};

/// Output family requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
	/// C API and proc table headers.
	Headers,
	/// C++ wrapper headers.
	CppHeaders,
	/// Proc table implementations.
	Proc,
	/// Native proc table forwarding.
	WebgpuDawnNativeProc,
	/// C++ wrapper implementation.
	Cpp,
	/// Upstream `webgpu.h`.
	WebgpuHeaders,
	/// Emscripten bindings.
	EmscriptenBits,
	/// Mock API for tests.
	MockApi,
	/// Native validation and structure utilities.
	NativeUtils,
	/// Wire client and server.
	Wire,
	/// LPM fuzzer protobuf grammar.
	LpmFuzzProto,
	/// LPM fuzzer serializer.
	LpmFuzzCpp,
}

impl Target {
	/// Every target in declaration order.
	pub const ALL: [Target; 12] = [
		Self::Headers,
		Self::CppHeaders,
		Self::Proc,
		Self::WebgpuDawnNativeProc,
		Self::Cpp,
		Self::WebgpuHeaders,
		Self::EmscriptenBits,
		Self::MockApi,
		Self::NativeUtils,
		Self::Wire,
		Self::LpmFuzzProto,
		Self::LpmFuzzCpp,
	];

	/// Command-line spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Headers => "headers",
			Self::CppHeaders => "cpp_headers",
			Self::Proc => "proc",
			Self::WebgpuDawnNativeProc => "webgpu_dawn_native_proc",
			Self::Cpp => "cpp",
			Self::WebgpuHeaders => "webgpu_headers",
			Self::EmscriptenBits => "emscripten_bits",
			Self::MockApi => "mock_api",
			Self::NativeUtils => "native_utils",
			Self::Wire => "wire",
			Self::LpmFuzzProto => "dawn_lpmfuzz_proto",
			Self::LpmFuzzCpp => "dawn_lpmfuzz_cpp",
		}
	}

	/// Parse a comma-separated target list.
	pub fn parse_list(value: &str) -> Result<Vec<Self>> {
		value.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::parse).collect()
	}

	/// Tag configuration the target's model is linked with.
	pub fn tag_filter(self) -> TagFilter {
		match self {
			Self::WebgpuHeaders => TagFilter::upstream(),
			Self::EmscriptenBits => TagFilter::emscripten(),
			Self::Wire | Self::LpmFuzzProto | Self::LpmFuzzCpp => TagFilter::wire(),
			Self::Headers | Self::CppHeaders | Self::Proc | Self::WebgpuDawnNativeProc | Self::Cpp | Self::MockApi | Self::NativeUtils => {
				TagFilter::native()
			}
		}
	}

	/// Target consumes derived wire commands.
	pub fn needs_wire(self) -> bool {
		matches!(self, Self::Wire | Self::LpmFuzzProto | Self::LpmFuzzCpp)
	}

	/// Target consumes the derived fuzz harness schema.
	pub fn needs_fuzz(self) -> bool {
		matches!(self, Self::LpmFuzzProto | Self::LpmFuzzCpp)
	}
}

impl FromStr for Target {
	type Err = SchemaError;

	fn from_str(value: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|item| item.as_str() == value)
			.ok_or_else(|| SchemaError::UnknownTarget { name: value.to_owned() })
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Input schemas of one generator invocation.
#[derive(Debug, Clone)]
pub struct SchemaSet {
	/// API schema JSON.
	pub api: Value,
	/// Wire schema, when wire targets are requested.
	pub wire: Option<WireSchema>,
	/// Fuzz schema, when fuzzer targets are requested.
	pub fuzz: Option<FuzzSchema>,
}

impl SchemaSet {
	/// Load the API schema and the optional wire and fuzz schemas from disk.
	pub fn load(api: &Path, wire: Option<&Path>, fuzz: Option<&Path>) -> Result<Self> {
		let api = load_json(api)?;
		let wire = wire.map(|path| load_json(path).and_then(|value| WireSchema::from_value(&value))).transpose()?;
		let fuzz = fuzz.map(|path| load_json(path).and_then(|value| FuzzSchema::from_value(&value))).transpose()?;
		Ok(Self { api, wire, fuzz })
	}
}

/// Finished models handed to one target's renderer.
#[derive(Debug, Clone)]
pub struct TargetModel {
	/// Requested target.
	pub target: Target,
	/// Linked API model.
	pub api: Arc<ApiModel>,
	/// Derived wire commands, for wire and fuzzer targets.
	pub wire: Option<Arc<WireModel>>,
	/// Derived harness commands, for fuzzer targets.
	pub fuzz: Option<Arc<FuzzModel>>,
}

/// Per-invocation cache of linked and derived models.
///
/// Targets sharing a tag configuration share one `ApiModel`.
#[derive(Debug)]
pub struct GenerationContext {
	schemas: SchemaSet,
	models: HashMap<TagFilter, Arc<ApiModel>>,
	wire: Option<Arc<WireModel>>,
	fuzz: Option<Arc<FuzzModel>>,
}

impl GenerationContext {
	/// Start a run over loaded schemas.
	pub fn new(schemas: SchemaSet) -> Self {
		Self {
			schemas,
			models: HashMap::new(),
			wire: None,
			fuzz: None,
		}
	}

	/// Linked model for a tag configuration, built on first use.
	pub fn api_model(&mut self, filter: &TagFilter) -> Result<Arc<ApiModel>> {
		if let Some(model) = self.models.get(filter) {
			return Ok(model.clone());
		}
		let model = Arc::new(ApiModel::parse(&self.schemas.api, filter)?);
		self.models.insert(filter.clone(), model.clone());
		Ok(model)
	}

	/// Wire commands derived from the wire-tagged model.
	pub fn wire_model(&mut self) -> Result<Arc<WireModel>> {
		if let Some(model) = &self.wire {
			return Ok(model.clone());
		}
		let api = self.api_model(&TagFilter::wire())?;
		let schema = self.schemas.wire.as_ref().ok_or(SchemaError::MissingSchema {
			target: Target::Wire.as_str(),
			schema: "wire",
		})?;
		let model = Arc::new(WireModel::derive(&api, schema)?);
		self.wire = Some(model.clone());
		Ok(model)
	}

	/// Fuzz harness commands derived from the wire model.
	pub fn fuzz_model(&mut self) -> Result<Arc<FuzzModel>> {
		if let Some(model) = &self.fuzz {
			return Ok(model.clone());
		}
		let wire = self.wire_model()?;
		let api = self.api_model(&TagFilter::wire())?;
		let schema = self.schemas.fuzz.as_ref().ok_or(SchemaError::MissingSchema {
			target: Target::LpmFuzzProto.as_str(),
			schema: "fuzz",
		})?;
		let model = Arc::new(FuzzModel::derive(&api, &wire, schema));
		self.fuzz = Some(model.clone());
		Ok(model)
	}

	/// Build every model the targets need before any of them is rendered.
	pub fn prepare(&mut self, targets: &[Target]) -> Result<Vec<TargetModel>> {
		let mut out = Vec::with_capacity(targets.len());
		for &target in targets {
			let api = self.api_model(&target.tag_filter())?;
			let wire = if target.needs_wire() { Some(self.wire_model()?) } else { None };
			let fuzz = if target.needs_fuzz() { Some(self.fuzz_model()?) } else { None };
			out.push(TargetModel { target, api, wire, fuzz });
		}
		debug!(targets = out.len(), models = self.models.len(), "prepared targets");
		Ok(out)
	}
}
