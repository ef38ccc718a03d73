use std::path::PathBuf;

use apilink::schema::{ApiModel, Method, RecordMember, RenderHelpers, Result, TypeId, TypeKind};

use crate::cmd::util::{MemberJson, emit_json, load_api, member_json, member_row, parse_target, require_item};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long = "type")]
	pub type_name: String,
	#[arg(long)]
	pub target: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print one linked item with its resolved references.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		type_name,
		target,
		json,
	} = args;

	let target = parse_target(target.as_deref())?;
	let api = load_api(&path, target)?;
	let id = require_item(&api, &type_name, target)?;
	let helpers = RenderHelpers::for_model(&api);
	let payload = show_json(&api, &helpers, id);

	if json {
		emit_json(&payload);
		return Ok(());
	}

	println!("name: {}", payload.name);
	println!("category: {}", payload.category);
	println!("c_type: {}", payload.c_type);
	println!("may_have_handle: {}", payload.may_have_handle);
	println!("wire_transparent: {}", payload.wire_transparent);
	print_kind(&api, &helpers, id);

	Ok(())
}

fn print_kind(api: &ApiModel, helpers: &RenderHelpers, id: TypeId) {
	let node = api.get(id);
	match &node.kind {
		TypeKind::Enum(item) => {
			println!("contiguous_from_zero: {}", item.contiguous_from_zero);
			println!("values:");
			for value in &item.values {
				println!(
					"  {}\t{}\t{}\t{}",
					helpers.as_c_enum(&node.name, &value.name),
					value.value,
					if value.valid { "valid" } else { "invalid" },
					RenderHelpers::as_js_enum_value(value)
				);
			}
		}
		TypeKind::Bitmask(item) => {
			println!("full_mask: 0x{:x}", item.full_mask);
			println!("values:");
			for value in &item.values {
				println!("  {}\t0x{:x}", helpers.as_c_enum(&node.name, &value.name), value.value);
			}
		}
		TypeKind::Structure(item) => {
			println!("extensibility: {}", item.extensibility.as_str());
			println!("chain_roots: {}", names_or_dash(api, &item.chain_roots));
			println!("extensions: {}", names_or_dash(api, &item.extensions));
			println!("free_members: {}", item.has_free_members_function());
			print_members(api, &item.members);
		}
		TypeKind::Object(_) => {
			println!("methods:");
			for method in api.c_methods(id) {
				println!(
					"  {}\t-> {}\t{}",
					helpers.as_c_method(Some(&node.name), &method.name),
					api.get(method.return_type).name.get(),
					if method.autolock { "autolock" } else { "no-autolock" }
				);
				for member in &method.arguments {
					println!("    {}", member_row(api, &method.arguments, member));
				}
			}
		}
		TypeKind::FunctionPointer(signature) => {
			println!("returns: {}", api.get(signature.return_type).name.get());
			print_members(api, &signature.arguments);
		}
		TypeKind::Function(item) => {
			println!("returns: {}", api.get(item.signature.return_type).name.get());
			println!("no_cpp: {}", item.no_cpp);
			print_members(api, &item.signature.arguments);
		}
		TypeKind::Typedef(item) => println!("target: {}", api.get(item.target).name.get()),
		TypeKind::Constant(item) => {
			println!("type: {}", api.get(item.ty).name.get());
			println!("value: {}", item.value);
		}
		TypeKind::Native => {}
	}
}

fn print_members(api: &ApiModel, members: &[RecordMember]) {
	println!("members:");
	println!("  name\ttype\tannotation\tlength\tflags");
	for member in members {
		println!("  {}", member_row(api, members, member));
	}
}

fn names_or_dash(api: &ApiModel, ids: &[TypeId]) -> String {
	if ids.is_empty() {
		return "-".to_owned();
	}
	ids.iter().map(|id| api.get(*id).name.get()).collect::<Vec<_>>().join(", ")
}

fn type_names(api: &ApiModel, ids: &[TypeId]) -> Vec<String> {
	ids.iter().map(|id| api.get(*id).name.get().to_owned()).collect()
}

fn members_json(api: &ApiModel, members: &[RecordMember]) -> Vec<MemberJson> {
	members.iter().map(|member| member_json(api, members, member)).collect()
}

fn method_json(api: &ApiModel, helpers: &RenderHelpers, object: TypeId, method: &Method) -> MethodJson {
	MethodJson {
		name: method.name.get().to_owned(),
		c_name: helpers.as_c_method(Some(&api.get(object).name), &method.name),
		returns: api.get(method.return_type).name.get().to_owned(),
		autolock: method.autolock,
		arguments: members_json(api, &method.arguments),
	}
}

fn show_json(api: &ApiModel, helpers: &RenderHelpers, id: TypeId) -> ShowJson {
	let node = api.get(id);
	let mut payload = ShowJson {
		name: node.name.get().to_owned(),
		category: node.category().as_str(),
		c_type: helpers.as_c_return_type(node),
		may_have_handle: node.may_have_handle,
		wire_transparent: node.wire_transparent,
		values: Vec::new(),
		full_mask: None,
		contiguous_from_zero: None,
		extensibility: None,
		chain_roots: Vec::new(),
		extensions: Vec::new(),
		free_members: None,
		members: Vec::new(),
		methods: Vec::new(),
		returns: None,
		target: None,
		value: None,
	};

	match &node.kind {
		TypeKind::Enum(item) => {
			payload.contiguous_from_zero = Some(item.contiguous_from_zero);
			payload.values = item
				.values
				.iter()
				.map(|value| ValueJson {
					name: value.name.get().to_owned(),
					value: value.value,
					valid: value.valid,
					js: Some(RenderHelpers::as_js_enum_value(value)),
				})
				.collect();
		}
		TypeKind::Bitmask(item) => {
			payload.full_mask = Some(item.full_mask);
			payload.values = item
				.values
				.iter()
				.map(|value| ValueJson {
					name: value.name.get().to_owned(),
					value: value.value,
					valid: true,
					js: None,
				})
				.collect();
		}
		TypeKind::Structure(item) => {
			payload.extensibility = Some(item.extensibility.as_str());
			payload.chain_roots = type_names(api, &item.chain_roots);
			payload.extensions = type_names(api, &item.extensions);
			payload.free_members = Some(item.has_free_members_function());
			payload.members = members_json(api, &item.members);
		}
		TypeKind::Object(_) => {
			payload.methods = api.c_methods(id).iter().map(|method| method_json(api, helpers, id, method)).collect();
		}
		TypeKind::FunctionPointer(signature) => {
			payload.returns = Some(api.get(signature.return_type).name.get().to_owned());
			payload.members = members_json(api, &signature.arguments);
		}
		TypeKind::Function(item) => {
			payload.returns = Some(api.get(item.signature.return_type).name.get().to_owned());
			payload.members = members_json(api, &item.signature.arguments);
		}
		TypeKind::Typedef(item) => payload.target = Some(api.get(item.target).name.get().to_owned()),
		TypeKind::Constant(item) => {
			payload.target = Some(api.get(item.ty).name.get().to_owned());
			payload.value = Some(item.value.clone());
		}
		TypeKind::Native => {}
	}

	payload
}

#[derive(serde::Serialize)]
struct ShowJson {
	name: String,
	category: &'static str,
	c_type: String,
	may_have_handle: bool,
	wire_transparent: bool,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	values: Vec<ValueJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	full_mask: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	contiguous_from_zero: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	extensibility: Option<&'static str>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	chain_roots: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	extensions: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	free_members: Option<bool>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	members: Vec<MemberJson>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	methods: Vec<MethodJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	returns: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	target: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	value: Option<serde_json::Value>,
}

#[derive(serde::Serialize)]
struct ValueJson {
	name: String,
	value: u64,
	valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	js: Option<String>,
}

#[derive(serde::Serialize)]
struct MethodJson {
	name: String,
	c_name: String,
	returns: String,
	autolock: bool,
	arguments: Vec<MemberJson>,
}
