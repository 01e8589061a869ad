//! Terminal launcher used by `open_terminal`.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use crate::error::{IoError, Result};

/// Runs an operator-visible shell command.
#[async_trait]
pub trait TerminalLauncher: Send + Sync {
	/// Runs `command` with `env` merged over the current process environment.
	async fn open_terminal(&self, command: &str, env: &HashMap<String, String>) -> Result<()>;
}

/// Runs commands through the platform shell, inheriting stdio.
#[derive(Debug, Clone, Default)]
pub struct SystemTerminal {
	working_dir: Option<std::path::PathBuf>,
}

impl SystemTerminal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_working_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
		self.working_dir = Some(dir.into());
		self
	}

	fn shell_command(command: &str) -> tokio::process::Command {
		if cfg!(windows) {
			let mut cmd = tokio::process::Command::new("cmd");
			cmd.args(["/C", command]);
			cmd
		} else {
			let mut cmd = tokio::process::Command::new("sh");
			cmd.args(["-c", command]);
			cmd
		}
	}
}

#[async_trait]
impl TerminalLauncher for SystemTerminal {
	async fn open_terminal(&self, command: &str, env: &HashMap<String, String>) -> Result<()> {
		let mut cmd = Self::shell_command(command);
		cmd.envs(env);
		if let Some(dir) = &self.working_dir {
			cmd.current_dir(dir);
		}

		info!(target: "keel.runtime", %command, env_vars = env.len(), "running terminal command");
		let status = cmd.status().await.map_err(|source| IoError::Spawn {
			command: command.to_string(),
			source,
		})?;

		if !status.success() {
			return Err(IoError::CommandFailed {
				command: command.to_string(),
				status,
			});
		}
		Ok(())
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;

	#[tokio::test]
	async fn env_is_visible_to_command() {
		let dir = std::env::temp_dir().join(format!("keel-terminal-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let env = HashMap::from([("KEEL_TEST_VALUE".to_string(), "from-env".to_string())]);

		SystemTerminal::new()
			.with_working_dir(&dir)
			.open_terminal("printf %s \"$KEEL_TEST_VALUE\" > out.txt", &env)
			.await
			.unwrap();

		assert_eq!(std::fs::read_to_string(dir.join("out.txt")).unwrap(), "from-env");
		let _ = std::fs::remove_dir_all(&dir);
	}

	#[tokio::test]
	async fn non_zero_exit_is_an_error() {
		let err = SystemTerminal::new().open_terminal("exit 3", &HashMap::new()).await.unwrap_err();
		assert!(matches!(err, IoError::CommandFailed { .. }));
	}
}
