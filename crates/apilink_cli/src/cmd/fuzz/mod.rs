use std::path::PathBuf;

use apilink::schema::{Result, Target};

use crate::cmd::util::{emit_json, open_context};
use crate::cmd::wire::{CommandJson, command_json, print_command};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub wire: PathBuf,
	#[arg(long)]
	pub fuzz: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print the command sets handed to the structured fuzzing harness.
pub fn run(args: Args) -> Result<()> {
	let Args { path, wire, fuzz, json } = args;

	let mut context = open_context(&path, Some(wire.as_path()), Some(fuzz.as_path()))?;
	let model = context.fuzz_model()?;
	let api = context.api_model(&Target::LpmFuzzProto.tag_filter())?;

	let skipped = model
		.skipped_structure_members
		.iter()
		.map(|(id, members)| {
			let structure = api.get(*id);
			let names = structure
				.as_structure()
				.map(|item| members.iter().filter_map(|idx| item.members.get(*idx)).map(|member| member.name.get().to_owned()).collect())
				.unwrap_or_default();
			SkippedJson {
				structure: structure.name.get().to_owned(),
				members: names,
			}
		})
		.collect::<Vec<_>>();

	if json {
		let payload = FuzzJson {
			generated_commands: model.generated_commands.iter().map(|command| command_json(&api, command)).collect(),
			all_commands: model.all_commands.iter().map(|command| command_json(&api, command)).collect(),
			skipped_structure_members: skipped,
			lpm_info: model.lpm_info.clone(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("generated_commands: {}", model.generated_commands.len());
	for command in &model.generated_commands {
		print_command(&api, command);
	}
	println!();
	let custom = model
		.all_commands
		.iter()
		.filter(|command| !model.generated_commands.iter().any(|item| item.name.get() == command.name.get()))
		.map(|command| command.name.get())
		.collect::<Vec<_>>();
	println!("custom_commands: {}", if custom.is_empty() { "-".to_owned() } else { custom.join(", ") });
	println!("skipped_structure_members:");
	for item in &skipped {
		println!("  {}: {}", item.structure, item.members.join(", "));
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct FuzzJson {
	generated_commands: Vec<CommandJson>,
	all_commands: Vec<CommandJson>,
	skipped_structure_members: Vec<SkippedJson>,
	lpm_info: Option<serde_json::Value>,
}

#[derive(serde::Serialize)]
struct SkippedJson {
	structure: String,
	members: Vec<String>,
}
