//! Command dispatch from parsed arguments to the host facade.

use std::collections::HashMap;
use std::sync::Arc;

use keel::protocol::{
	AwsIamRoleChainedSessionData, AwsIamRoleFederatedSessionData, AwsIamUserSessionData, Session, SessionDescriptor,
	valid_region,
};
use keel::runtime::{CliNative, CliWebConsole, DesktopNative, SystemTerminal, TracingLogSink, WindowService};
use keel::{
	ActionBar, DeploymentForm, HostConfig, HostEnvironment, HostError, PluginEnvironment, SessionRepository,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::actions::LocalSessionActions;
use crate::cli::{Commands, IdpCommand, ProfileCommand, SessionCommand, SessionForm};
use crate::error::Result;
use crate::service::local_registry;
use crate::store::WorkspaceStore;

/// Everything a command needs: the workspace and a host bound to it.
pub struct CommandContext {
	pub store: Arc<WorkspaceStore>,
	pub host: Arc<HostEnvironment>,
}

impl CommandContext {
	pub fn new(store: WorkspaceStore, form: DeploymentForm, launch_browser: bool) -> Result<Self> {
		let store = Arc::new(store);
		let (window, console) = if launch_browser {
			(WindowService::detect(), CliWebConsole::stderr())
		} else {
			(
				WindowService::with_opener(None),
				CliWebConsole::with_writer(Box::new(std::io::stderr()), None),
			)
		};

		let desktop_native = DesktopNative::new().map_err(HostError::from)?;
		let cli_native = CliNative::new().map_err(HostError::from)?;

		let config = HostConfig::builder()
			.with_log_sink(Arc::new(TracingLogSink))
			.with_registry(Arc::new(local_registry(&store)))
			.with_repository(store.clone())
			.with_terminal(Arc::new(SystemTerminal::new()))
			.with_desktop_native(Arc::new(desktop_native))
			.with_window_service(Arc::new(window))
			.with_cli_native(Arc::new(cli_native))
			.with_cli_web_console(Arc::new(console));

		let host = Arc::new(HostEnvironment::new(form, config)?);
		debug!(target: "keel.cli", workspace = %store.path().display(), ?host, "command context ready");
		Ok(Self { store, host })
	}

	fn session(&self, id: &str) -> Result<Session> {
		self.store
			.get_session(id)
			.ok_or_else(|| HostError::SessionNotFound(id.to_string()).into())
	}

	/// Turns parsed form arguments into a validated descriptor, resolving
	/// profile names and identity-provider URLs through the host.
	fn descriptor(&self, form: SessionForm) -> Result<SessionDescriptor> {
		let descriptor: SessionDescriptor = match form {
			SessionForm::IamUser(args) => {
				let profile_id = self.host.resolve_profile_id_by_name(&args.profile)?;
				let data =
					AwsIamUserSessionData::new(args.name, args.access_key, args.secret_key, args.region, profile_id)?;
				match args.mfa_device {
					Some(device) => data.with_mfa_device(device)?.into(),
					None => data.into(),
				}
			}
			SessionForm::Federated(args) => {
				let profile_id = self.host.resolve_profile_id_by_name(&args.profile)?;
				let idp_url_id = self.host.resolve_idp_id_by_url(&args.idp_url)?;
				AwsIamRoleFederatedSessionData::new(
					args.name,
					args.region,
					args.role_arn,
					args.idp_arn,
					idp_url_id,
					profile_id,
				)?
				.into()
			}
			SessionForm::Chained(args) => {
				let profile_id = self.host.resolve_profile_id_by_name(&args.profile)?;
				let data =
					AwsIamRoleChainedSessionData::new(args.name, args.region, args.role_arn, args.parent, profile_id)?;
				match args.role_session_name {
					Some(name) => data.with_role_session_name(name)?.into(),
					None => data.into(),
				}
			}
		};
		Ok(descriptor)
	}
}

/// Short name used in the output envelope.
pub fn command_name(command: &Commands) -> &'static str {
	match command {
		Commands::Session(session) => match session {
			SessionCommand::List => "session list",
			SessionCommand::Create(_) => "session create",
			SessionCommand::Clone { .. } => "session clone",
			SessionCommand::Update { .. } => "session update",
			SessionCommand::Start { .. } => "session start",
			SessionCommand::Stop { .. } => "session stop",
			SessionCommand::Pin { .. } => "session pin",
			SessionCommand::Unpin { .. } => "session unpin",
			SessionCommand::Delete { .. } => "session delete",
			SessionCommand::Console { .. } => "session console",
			SessionCommand::Actions { .. } => "session actions",
			SessionCommand::Region { .. } => "session region",
			SessionCommand::Profile { .. } => "session profile",
			SessionCommand::Ssm { .. } => "session ssm",
		},
		Commands::Credentials { .. } => "credentials",
		Commands::Open { .. } => "open",
		Commands::Fetch { .. } => "fetch",
		Commands::Profile(_) => "profile",
		Commands::Idp(_) => "idp",
		Commands::Terminal { .. } => "terminal",
	}
}

pub async fn dispatch(ctx: &CommandContext, command: Commands) -> Result<Value> {
	match command {
		Commands::Session(session) => session_command(ctx, session).await,
		Commands::Credentials { id } => {
			let credentials = ctx.host.generate_credentials(&id).await?;
			Ok(serde_json::to_value(credentials)?)
		}
		Commands::Open { url } => {
			ctx.host.open_external_url(&url)?;
			Ok(json!({ "url": url }))
		}
		Commands::Fetch { url } => {
			let response = ctx.host.fetch(&url).await?;
			Ok(json!({
				"url": response.url,
				"status": response.status,
				"contentType": response.content_type,
				"body": response.body,
			}))
		}
		Commands::Profile(profile) => match profile {
			ProfileCommand::List => Ok(serde_json::to_value(ctx.store.profiles())?),
			ProfileCommand::Add { name } => Ok(json!({ "id": ctx.store.add_profile(&name)?, "name": name })),
			ProfileCommand::Resolve { name } => {
				Ok(json!({ "id": ctx.host.resolve_profile_id_by_name(&name)?, "name": name }))
			}
		},
		Commands::Idp(idp) => match idp {
			IdpCommand::List => Ok(serde_json::to_value(ctx.store.idp_urls())?),
			IdpCommand::Add { url } => Ok(json!({ "id": ctx.store.add_idp_url(&url)?, "url": url })),
			IdpCommand::Resolve { url } => Ok(json!({ "id": ctx.host.resolve_idp_id_by_url(&url)?, "url": url })),
		},
		Commands::Terminal { command, env } => {
			let env: HashMap<String, String> = env.into_iter().collect();
			ctx.host.open_terminal(&command, Some(&env)).await?;
			Ok(json!({ "command": command }))
		}
	}
}

async fn session_command(ctx: &CommandContext, command: SessionCommand) -> Result<Value> {
	let actions = LocalSessionActions::new(ctx.store.clone(), ctx.host.clone());

	match command {
		SessionCommand::List => {
			let sessions: Vec<Value> = ctx
				.store
				.sessions()
				.into_iter()
				.map(|session| {
					json!({
						"sessionId": session.session_id,
						"sessionName": session.session_name,
						"sessionType": session.session_type,
						"status": session.status,
						"region": session.region,
						"pinned": ctx.store.is_pinned(&session.session_id),
					})
				})
				.collect();
			Ok(Value::Array(sessions))
		}
		SessionCommand::Create(form) => {
			let descriptor = ctx.descriptor(form)?;
			let session_id = ctx.host.create_session(&descriptor).await?;
			Ok(json!({ "sessionId": session_id }))
		}
		SessionCommand::Clone { id } => {
			let session_id = ctx.host.clone_session(&id).await?;
			Ok(json!({ "sessionId": session_id, "clonedFrom": id }))
		}
		SessionCommand::Update { id, form } => {
			let session = ctx.session(&id)?;
			let descriptor = ctx.descriptor(form)?;
			ActionBar::new(&session, &actions).edit_session(&descriptor).await?;
			Ok(json!({ "sessionId": id }))
		}
		SessionCommand::Actions { id, compact } => {
			let session = ctx.session(&id)?;
			let bar = ActionBar::new(&session, &actions).compact(compact);
			Ok(json!({
				"sessionId": id,
				"pinned": bar.is_pinned(),
				"actions": bar.available_actions(),
			}))
		}
		SessionCommand::Start { id } => toggle(ctx, &actions, &id, Toggle::Start).await,
		SessionCommand::Stop { id } => toggle(ctx, &actions, &id, Toggle::Stop).await,
		SessionCommand::Pin { id } => toggle(ctx, &actions, &id, Toggle::Pin).await,
		SessionCommand::Unpin { id } => toggle(ctx, &actions, &id, Toggle::Unpin).await,
		SessionCommand::Delete { id } => toggle(ctx, &actions, &id, Toggle::Delete).await,
		SessionCommand::Console { id } => toggle(ctx, &actions, &id, Toggle::Console).await,
		SessionCommand::Region { id, region } => {
			let region = valid_region(region)?;
			let session = ctx.session(&id)?;
			ActionBar::new(&session, &actions).change_region(&region).await?;
			Ok(json!({ "sessionId": id, "region": region }))
		}
		SessionCommand::Profile { id, profile } => {
			let session = ctx.session(&id)?;
			let profile_id = ctx.host.resolve_profile_id_by_name(&profile)?;
			ActionBar::new(&session, &actions).change_profile(&profile_id).await?;
			Ok(json!({ "sessionId": id, "profileId": profile_id }))
		}
		SessionCommand::Ssm { id, instance } => {
			let session = ctx.session(&id)?;
			ActionBar::new(&session, &actions).open_ssm(&instance).await?;
			Ok(json!({ "sessionId": id, "instance": instance }))
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
	Start,
	Stop,
	Pin,
	Unpin,
	Delete,
	Console,
}

/// Runs an argument-free bar action and reports the session's resulting state.
async fn toggle(ctx: &CommandContext, actions: &LocalSessionActions, id: &str, toggle: Toggle) -> Result<Value> {
	let session = ctx.session(id)?;
	let bar = ActionBar::new(&session, actions);
	match toggle {
		Toggle::Start => bar.start_session().await?,
		Toggle::Stop => bar.stop_session().await?,
		Toggle::Pin => bar.pin_session().await?,
		Toggle::Unpin => bar.unpin_session().await?,
		Toggle::Delete => bar.delete_session().await?,
		Toggle::Console => bar.open_aws_web_console().await?,
	}

	Ok(match ctx.store.get_session(id) {
		Some(updated) => json!({
			"sessionId": id,
			"status": updated.status,
			"pinned": ctx.store.is_pinned(id),
		}),
		None => json!({ "sessionId": id, "deleted": true }),
	})
}
