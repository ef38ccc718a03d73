use std::path::Path;
use std::sync::Arc;

use apilink::schema::{ApiModel, GenerationContext, Length, RecordMember, Result, SchemaError, SchemaSet, Target, TypeId};
use tracing::debug;

/// Print a JSON payload on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Parse `--target`, defaulting to the native headers configuration.
pub(crate) fn parse_target(value: Option<&str>) -> Result<Target> {
	value.map_or(Ok(Target::Headers), str::parse)
}

/// Load schemas into a fresh generation context.
pub(crate) fn open_context(api: &Path, wire: Option<&Path>, fuzz: Option<&Path>) -> Result<GenerationContext> {
	debug!(api = %api.display(), wire = ?wire, fuzz = ?fuzz, "loading schemas");
	Ok(GenerationContext::new(SchemaSet::load(api, wire, fuzz)?))
}

/// Linked model for a single target.
pub(crate) fn load_api(path: &Path, target: Target) -> Result<Arc<ApiModel>> {
	let mut context = open_context(path, None, None)?;
	debug!(target = target.as_str(), "linking api model");
	context.api_model(&target.tag_filter())
}

/// Resolve an item name or report it as missing under `target`.
pub(crate) fn require_item(api: &ApiModel, name: &str, target: Target) -> Result<TypeId> {
	api.lookup(name).ok_or_else(|| SchemaError::UnknownItem {
		name: name.to_owned(),
		target: target.as_str(),
	})
}

/// Render a member's length descriptor against its siblings.
pub(crate) fn length_label(members: &[RecordMember], length: Length) -> String {
	match length {
		Length::None => "-".to_owned(),
		Length::NullTerminated => "strlen".to_owned(),
		Length::Constant(count) => count.to_string(),
		Length::Member(idx) => members.get(idx).map(|member| member.name.get().to_owned()).unwrap_or_else(|| format!("#{idx}")),
	}
}

/// Tab-separated member row used by the text listings.
pub(crate) fn member_row(api: &ApiModel, members: &[RecordMember], member: &RecordMember) -> String {
	let mut flags = Vec::new();
	if member.optional {
		flags.push("optional");
	}
	if member.is_return_value {
		flags.push("return");
	}
	if member.skip_serialize {
		flags.push("skip");
	}
	let flags = if flags.is_empty() { "-".to_owned() } else { flags.join(",") };

	format!(
		"{}\t{}\t{}\t{}\t{}",
		member.name.get(),
		api.get(member.ty).name.get(),
		member.annotation.as_str(),
		length_label(members, member.length),
		flags
	)
}

/// JSON shape of one member.
pub(crate) fn member_json(api: &ApiModel, members: &[RecordMember], member: &RecordMember) -> MemberJson {
	MemberJson {
		name: member.name.get().to_owned(),
		type_name: api.get(member.ty).name.get().to_owned(),
		annotation: member.annotation.as_str(),
		length: match member.length {
			Length::None => None,
			length => Some(length_label(members, length)),
		},
		optional: member.optional,
		is_return_value: member.is_return_value,
		skip_serialize: member.skip_serialize,
		handle_type: member.handle_type.map(|id| api.get(id).name.get().to_owned()),
		id_type: member.id_type.map(|id| api.get(id).name.get().to_owned()),
		default: member.default_value.clone(),
	}
}

#[derive(serde::Serialize)]
pub(crate) struct MemberJson {
	name: String,
	#[serde(rename = "type")]
	type_name: String,
	annotation: &'static str,
	length: Option<String>,
	optional: bool,
	is_return_value: bool,
	skip_serialize: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	handle_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	id_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<serde_json::Value>,
}
