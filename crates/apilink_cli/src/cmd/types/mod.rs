use std::path::PathBuf;

use apilink::schema::{ApiModel, Category, Result, SchemaError, TypeKind, TypeNode};

use crate::cmd::util::{emit_json, load_api, parse_target};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub target: Option<String>,
	#[arg(long)]
	pub category: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// List linked items in generation order.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		target,
		category,
		json,
	} = args;

	let target = parse_target(target.as_deref())?;
	let categories = match category.as_deref() {
		Some(name) => vec![Category::parse(name).ok_or_else(|| SchemaError::UnknownCategory { name: name.to_owned() })?],
		None => Category::ALL.to_vec(),
	};
	let model = load_api(&path, target)?;
	let api: &ApiModel = &model;

	let rows = categories
		.into_iter()
		.flat_map(move |category| api.by_category(category).iter().map(move |id| type_row(api, api.get(*id))))
		.collect::<Vec<_>>();

	if json {
		emit_json(&TypesJson {
			target: target.as_str(),
			count: rows.len(),
			types: rows,
		});
		return Ok(());
	}

	println!("name\tcategory\thandle\ttransparent\tdetail");
	for row in &rows {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			row.name,
			row.category,
			row.may_have_handle,
			row.wire_transparent,
			row.detail.as_deref().unwrap_or("-")
		);
	}

	Ok(())
}

fn type_row(api: &ApiModel, node: &TypeNode) -> TypeRowJson {
	let detail = match &node.kind {
		TypeKind::Enum(item) => Some(format!("{} values", item.values.len())),
		TypeKind::Bitmask(item) => Some(format!("{} values, mask 0x{:x}", item.values.len(), item.full_mask)),
		TypeKind::Object(item) => Some(format!("{} methods", item.methods.len())),
		TypeKind::Structure(item) => Some(format!("{}, {} members", item.extensibility.as_str(), item.members.len())),
		TypeKind::Typedef(item) => Some(format!("= {}", api.get(item.target).name.get())),
		TypeKind::Constant(item) => Some(format!("{} = {}", api.get(item.ty).name.get(), item.value)),
		TypeKind::FunctionPointer(signature) => Some(format!("-> {}", api.get(signature.return_type).name.get())),
		TypeKind::Function(item) => Some(format!("-> {}", api.get(item.signature.return_type).name.get())),
		TypeKind::Native => None,
	};

	TypeRowJson {
		name: node.name.get().to_owned(),
		category: node.category().as_str(),
		may_have_handle: node.may_have_handle,
		wire_transparent: node.wire_transparent,
		detail,
	}
}

#[derive(serde::Serialize)]
struct TypesJson {
	target: &'static str,
	count: usize,
	types: Vec<TypeRowJson>,
}

#[derive(serde::Serialize)]
struct TypeRowJson {
	name: String,
	category: &'static str,
	may_have_handle: bool,
	wire_transparent: bool,
	detail: Option<String>,
}
