use std::path::PathBuf;

use apilink::schema::{Category, RenderHelpers, Result};

use crate::cmd::util::{emit_json, load_api, parse_target};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub target: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print per-category item counts of the linked model.
pub fn run(args: Args) -> Result<()> {
	let Args { path, target, json } = args;

	let target = parse_target(target.as_deref())?;
	let api = load_api(&path, target)?;
	let helpers = RenderHelpers::for_model(&api);
	let metadata = api.metadata.as_ref();

	let categories = Category::ALL
		.into_iter()
		.map(|category| CategoryCountJson {
			category: category.as_str(),
			count: api.by_category(category).len(),
		})
		.collect::<Vec<_>>();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			target: target.as_str(),
			enabled_tags: api.filter.enabled.iter().cloned().collect(),
			disabled_tags: api.filter.disabled.iter().cloned().collect(),
			api: metadata.map(|item| item.api.clone()),
			c_prefix: helpers.c_prefix.clone(),
			namespace: helpers.namespace.clone(),
			item_count: api.len(),
			categories,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("target: {target}");
	println!("enabled_tags: {}", join_or_dash(api.filter.enabled.iter()));
	println!("disabled_tags: {}", join_or_dash(api.filter.disabled.iter()));
	println!("api: {}", metadata.map_or("-", |item| item.api.as_str()));
	println!("c_prefix: {}", helpers.c_prefix);
	println!("namespace: {}", helpers.namespace);
	println!("item_count: {}", api.len());
	println!("categories:");
	for item in &categories {
		println!("  {}: {}", item.category, item.count);
	}

	Ok(())
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a String>) -> String {
	let out = items.map(String::as_str).collect::<Vec<_>>().join(",");
	if out.is_empty() { "-".to_owned() } else { out }
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	target: &'static str,
	enabled_tags: Vec<String>,
	disabled_tags: Vec<String>,
	api: Option<String>,
	c_prefix: String,
	namespace: String,
	item_count: usize,
	categories: Vec<CategoryCountJson>,
}

#[derive(serde::Serialize)]
struct CategoryCountJson {
	category: &'static str,
	count: usize,
}
