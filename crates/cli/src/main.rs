mod actions;
mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod service;
mod store;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::commands::{CommandContext, command_name, dispatch};
use crate::error::Result;
use crate::output::CommandResult;
use crate::store::{WorkspaceStore, default_workspace_path};

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let name = command_name(&cli.command);
	let result = match run(cli).await {
		Ok(data) => CommandResult::success(name, data),
		Err(err) => {
			debug!(target: "keel.cli", command = name, error = %err, "command failed");
			CommandResult::failure(name, &err)
		}
	};

	result.print(format);
	if result.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn run(cli: Cli) -> Result<serde_json::Value> {
	let path = cli.workspace.unwrap_or_else(default_workspace_path);
	let store = WorkspaceStore::load(path)?;
	let ctx = CommandContext::new(store, cli.form.into(), !cli.no_browser)?;
	dispatch(&ctx, cli.command).await
}
