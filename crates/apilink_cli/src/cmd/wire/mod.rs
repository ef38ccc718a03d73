use std::path::PathBuf;

use apilink::schema::{ApiModel, Command, Result, Target, WireModel};

use crate::cmd::util::{MemberJson, emit_json, member_json, member_row, open_context};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub wire: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print client-to-server and server-to-client wire commands.
pub fn run(args: Args) -> Result<()> {
	let Args { path, wire, json } = args;

	let mut context = open_context(&path, Some(wire.as_path()), None)?;
	let model = context.wire_model()?;
	let api = context.api_model(&Target::Wire.tag_filter())?;

	if json {
		emit_json(&wire_json(&api, &model));
		return Ok(());
	}

	println!("commands: {}", model.commands.len());
	for command in &model.commands {
		print_command(&api, command);
	}
	println!();
	println!("return_commands: {}", model.return_commands.len());
	for command in &model.return_commands {
		print_command(&api, command);
	}
	println!();
	println!("client_handwritten_commands: {}", model.special_items.client_handwritten_commands.join(", "));
	println!("client_side_commands: {}", model.special_items.client_side_commands.join(", "));

	Ok(())
}

pub(crate) fn print_command(api: &ApiModel, command: &Command) {
	let origin = origin_label(api, command).unwrap_or_else(|| "raw".to_owned());
	println!("  {}\t{}\thandle={}", command.name.pascal_case(), origin, command.may_have_handle);
	for member in &command.members {
		println!("    {}", member_row(api, &command.members, member));
	}
}

fn origin_label(api: &ApiModel, command: &Command) -> Option<String> {
	let derived = command.derived?;
	let object = api.get(derived.object);
	let method = object.as_object()?.methods.get(derived.method)?;
	Some(format!("{}.{}", object.name.get(), method.name.get()))
}

pub(crate) fn command_json(api: &ApiModel, command: &Command) -> CommandJson {
	CommandJson {
		name: command.name.get().to_owned(),
		suffix: command.name.pascal_case(),
		derived_from: origin_label(api, command),
		may_have_handle: command.may_have_handle,
		members: command.members.iter().map(|member| member_json(api, &command.members, member)).collect(),
	}
}

fn wire_json(api: &ApiModel, model: &WireModel) -> WireJson {
	WireJson {
		commands: model.commands.iter().map(|command| command_json(api, command)).collect(),
		return_commands: model.return_commands.iter().map(|command| command_json(api, command)).collect(),
		client_handwritten_commands: model.special_items.client_handwritten_commands.clone(),
		client_side_commands: model.special_items.client_side_commands.clone(),
	}
}

#[derive(serde::Serialize)]
struct WireJson {
	commands: Vec<CommandJson>,
	return_commands: Vec<CommandJson>,
	client_handwritten_commands: Vec<String>,
	client_side_commands: Vec<String>,
}

#[derive(serde::Serialize)]
pub(crate) struct CommandJson {
	name: String,
	suffix: String,
	derived_from: Option<String>,
	may_have_handle: bool,
	members: Vec<MemberJson>,
}
