//! Surface exposed to third-party plugins.

use std::collections::HashMap;

use async_trait::async_trait;
use keel_protocol::{PluginLogLevel, SessionData};
use keel_runtime::FetchResponse;

use crate::error::Result;

/// Operations a plugin may invoke on its host.
///
/// Plugins receive `&dyn PluginEnvironment`; [`HostEnvironment`] is the
/// implementation the application hands out.
///
/// [`HostEnvironment`]: crate::HostEnvironment
#[async_trait]
pub trait PluginEnvironment: Send + Sync {
	/// Writes a log entry attributed to this host. Never fails.
	fn log(&self, message: &str, level: PluginLogLevel, display: bool);

	/// Fetches `url` through the host's native I/O.
	async fn fetch(&self, url: &str) -> Result<FetchResponse>;

	/// Opens `url` outside the host, in a browser window or via a printed command.
	fn open_external_url(&self, url: &str) -> Result<()>;

	/// Creates a session from `descriptor` and returns the new session id.
	async fn create_session(&self, descriptor: &dyn SessionData) -> Result<String>;

	/// Duplicates an existing session and returns the new session id.
	async fn clone_session(&self, session_id: &str) -> Result<String>;

	/// Replaces the configuration of `session_id` with `descriptor`.
	async fn update_session(&self, descriptor: &dyn SessionData, session_id: &str) -> Result<()>;

	/// Runs `command` in a terminal with `env` added to its environment.
	async fn open_terminal(&self, command: &str, env: Option<&HashMap<String, String>>) -> Result<()>;

	/// Internal id of the named profile called `name`.
	fn resolve_profile_id_by_name(&self, name: &str) -> Result<String>;

	/// Internal id of the identity-provider URL `url`.
	fn resolve_idp_id_by_url(&self, url: &str) -> Result<String>;
}
