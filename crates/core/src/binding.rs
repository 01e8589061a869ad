//! Deployment-form selection of the host's I/O collaborators.
//!
//! [`HostConfig`] enumerates every collaborator a host may need. The
//! [`DeploymentBinding`] picks the native-I/O and URL-opener pair for the
//! chosen [`DeploymentForm`] and fails construction when one is missing.

use std::fmt;
use std::sync::Arc;

use keel_runtime::{ExternalUrlOpener, LogSink, NativeIo, TerminalLauncher};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HostError, Result};
use crate::service::{SessionRepository, SessionServiceRegistry};

/// Whether the host runs inside the desktop app or as a command-line tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentForm {
	Desktop,
	Cli,
}

impl fmt::Display for DeploymentForm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeploymentForm::Desktop => f.write_str("desktop"),
			DeploymentForm::Cli => f.write_str("cli"),
		}
	}
}

/// Collaborators available to a host, validated once by [`HostEnvironment::new`].
///
/// [`HostEnvironment::new`]: crate::HostEnvironment::new
#[derive(Clone, Default)]
pub struct HostConfig {
	pub(crate) log_sink: Option<Arc<dyn LogSink>>,
	pub(crate) registry: Option<Arc<dyn SessionServiceRegistry>>,
	pub(crate) repository: Option<Arc<dyn SessionRepository>>,
	pub(crate) terminal: Option<Arc<dyn TerminalLauncher>>,
	desktop_native: Option<Arc<dyn NativeIo>>,
	window_service: Option<Arc<dyn ExternalUrlOpener>>,
	cli_native: Option<Arc<dyn NativeIo>>,
	cli_web_console: Option<Arc<dyn ExternalUrlOpener>>,
}

impl HostConfig {
	pub fn builder() -> Self {
		Self::default()
	}

	/// Sets the sink that receives plugin log entries.
	pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
		self.log_sink = Some(sink);
		self
	}

	/// Sets the per-type session service registry.
	pub fn with_registry(mut self, registry: Arc<dyn SessionServiceRegistry>) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Sets the repository used for session and lookup reads.
	pub fn with_repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
		self.repository = Some(repository);
		self
	}

	/// Sets the terminal launcher behind `open_terminal`.
	pub fn with_terminal(mut self, terminal: Arc<dyn TerminalLauncher>) -> Self {
		self.terminal = Some(terminal);
		self
	}

	/// Sets the desktop app's native I/O service.
	pub fn with_desktop_native(mut self, native: Arc<dyn NativeIo>) -> Self {
		self.desktop_native = Some(native);
		self
	}

	/// Sets the desktop app's window service.
	pub fn with_window_service(mut self, opener: Arc<dyn ExternalUrlOpener>) -> Self {
		self.window_service = Some(opener);
		self
	}

	/// Sets the command-line native I/O service.
	pub fn with_cli_native(mut self, native: Arc<dyn NativeIo>) -> Self {
		self.cli_native = Some(native);
		self
	}

	/// Sets the command-line web console opener.
	pub fn with_cli_web_console(mut self, opener: Arc<dyn ExternalUrlOpener>) -> Self {
		self.cli_web_console = Some(opener);
		self
	}
}

impl fmt::Debug for HostConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HostConfig")
			.field("log_sink", &self.log_sink.is_some())
			.field("registry", &self.registry.is_some())
			.field("repository", &self.repository.is_some())
			.field("terminal", &self.terminal.is_some())
			.field("desktop_native", &self.desktop_native.is_some())
			.field("window_service", &self.window_service.is_some())
			.field("cli_native", &self.cli_native.is_some())
			.field("cli_web_console", &self.cli_web_console.is_some())
			.finish()
	}
}

/// Native-I/O and URL-opener pair bound for one deployment form.
#[derive(Clone)]
pub struct DeploymentBinding {
	form: DeploymentForm,
	native: Arc<dyn NativeIo>,
	url_opener: Arc<dyn ExternalUrlOpener>,
}

impl DeploymentBinding {
	/// Selects the collaborators for `form` from `config`.
	pub fn resolve(form: DeploymentForm, config: &HostConfig) -> Result<Self> {
		let missing = |collaborator| HostError::MissingCollaborator { form, collaborator };

		let (native, url_opener) = match form {
			DeploymentForm::Desktop => (
				config.desktop_native.clone().ok_or_else(|| missing("desktop_native"))?,
				config.window_service.clone().ok_or_else(|| missing("window_service"))?,
			),
			DeploymentForm::Cli => (
				config.cli_native.clone().ok_or_else(|| missing("cli_native"))?,
				config.cli_web_console.clone().ok_or_else(|| missing("cli_web_console"))?,
			),
		};

		debug!(target: "keel.binding", %form, "bound native I/O and URL opener");
		Ok(Self { form, native, url_opener })
	}

	pub fn form(&self) -> DeploymentForm {
		self.form
	}

	pub fn native(&self) -> &Arc<dyn NativeIo> {
		&self.native
	}

	pub fn url_opener(&self) -> &Arc<dyn ExternalUrlOpener> {
		&self.url_opener
	}
}

impl fmt::Debug for DeploymentBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DeploymentBinding").field("form", &self.form).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use async_trait::async_trait;
	use keel_runtime::FetchResponse;

	use super::*;

	struct NoopNative;

	#[async_trait]
	impl NativeIo for NoopNative {
		async fn fetch(&self, url: &str) -> keel_runtime::Result<FetchResponse> {
			Ok(FetchResponse {
				url: url.to_string(),
				status: 204,
				content_type: None,
				body: String::new(),
			})
		}
	}

	struct NoopOpener;

	impl ExternalUrlOpener for NoopOpener {
		fn open_external_url(&self, _url: &str) -> keel_runtime::Result<()> {
			Ok(())
		}
	}

	fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const () {
		Arc::as_ptr(arc) as *const ()
	}

	struct Wired {
		config: HostConfig,
		desktop_native: Arc<NoopNative>,
		window: Arc<NoopOpener>,
		cli_native: Arc<NoopNative>,
		console: Arc<NoopOpener>,
	}

	fn wired() -> Wired {
		let desktop_native = Arc::new(NoopNative);
		let window = Arc::new(NoopOpener);
		let cli_native = Arc::new(NoopNative);
		let console = Arc::new(NoopOpener);
		let config = HostConfig::builder()
			.with_desktop_native(desktop_native.clone())
			.with_window_service(window.clone())
			.with_cli_native(cli_native.clone())
			.with_cli_web_console(console.clone());
		Wired {
			config,
			desktop_native,
			window,
			cli_native,
			console,
		}
	}

	#[test]
	fn desktop_binds_desktop_native_and_window_service() {
		let wired = wired();
		let binding = DeploymentBinding::resolve(DeploymentForm::Desktop, &wired.config).unwrap();
		assert_eq!(binding.form(), DeploymentForm::Desktop);
		assert_eq!(data_ptr(binding.native()), data_ptr(&wired.desktop_native));
		assert_eq!(data_ptr(binding.url_opener()), data_ptr(&wired.window));
	}

	#[test]
	fn cli_binds_cli_native_and_web_console() {
		let wired = wired();
		let binding = DeploymentBinding::resolve(DeploymentForm::Cli, &wired.config).unwrap();
		assert_eq!(data_ptr(binding.native()), data_ptr(&wired.cli_native));
		assert_eq!(data_ptr(binding.url_opener()), data_ptr(&wired.console));
	}

	#[test]
	fn missing_form_collaborator_fails() {
		let config = HostConfig::builder().with_cli_native(Arc::new(NoopNative)).with_cli_web_console(Arc::new(NoopOpener));
		let err = DeploymentBinding::resolve(DeploymentForm::Desktop, &config).unwrap_err();
		assert!(matches!(
			err,
			HostError::MissingCollaborator {
				form: DeploymentForm::Desktop,
				collaborator: "desktop_native"
			}
		));

		let config = HostConfig::builder().with_cli_native(Arc::new(NoopNative));
		let err = DeploymentBinding::resolve(DeploymentForm::Cli, &config).unwrap_err();
		assert_eq!(err.to_string(), "deployment form `cli` requires collaborator `cli_web_console`");
	}
}
