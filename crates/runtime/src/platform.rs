//! Platform detection for launching URLs in the system browser.

use std::process::{Command, Stdio};

use url::Url;

use crate::error::{IoError, Result};

/// Parses `url` and requires an `http`/`https` scheme.
pub fn parse_web_url(url: &str) -> Result<Url> {
	let parsed = Url::parse(url).map_err(|e| IoError::InvalidUrl {
		url: url.to_string(),
		reason: e.to_string(),
	})?;
	match parsed.scheme() {
		"http" | "https" => Ok(parsed),
		other => Err(IoError::InvalidUrl {
			url: url.to_string(),
			reason: format!("unsupported scheme `{other}`"),
		}),
	}
}

/// Returns `true` when running under Windows Subsystem for Linux.
pub fn is_wsl() -> bool {
	if !cfg!(target_os = "linux") {
		return false;
	}
	std::fs::read_to_string("/proc/sys/kernel/osrelease")
		.map(|release| release.to_lowercase().contains("microsoft"))
		.unwrap_or(false)
}

/// Program plus leading arguments that open a URL in the default browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenerCommand {
	pub program: String,
	pub args: Vec<String>,
}

impl OpenerCommand {
	fn new(program: &str, args: &[&str]) -> Self {
		Self {
			program: program.to_string(),
			args: args.iter().map(|a| a.to_string()).collect(),
		}
	}

	/// Shell-style rendering of the full launch command for `url`.
	pub fn render(&self, url: &str) -> String {
		let mut parts = vec![self.program.clone()];
		parts.extend(self.args.iter().cloned());
		parts.push(url.to_string());
		parts.join(" ")
	}

	/// Spawns the opener detached from the current terminal.
	pub fn spawn(&self, url: &str) -> Result<()> {
		let mut cmd = Command::new(&self.program);
		cmd.args(&self.args).arg(url).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

		#[cfg(unix)]
		std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

		cmd.spawn().map(drop).map_err(|source| IoError::Spawn {
			command: self.render(url),
			source,
		})
	}
}

/// Finds the platform command that opens URLs in the default browser.
pub fn find_url_opener() -> Option<OpenerCommand> {
	if cfg!(target_os = "macos") {
		return Some(OpenerCommand::new("open", &[]));
	}
	if cfg!(target_os = "windows") {
		return Some(windows_opener());
	}

	let candidates: &[&str] = if is_wsl() {
		&["wslview", "xdg-open"]
	} else {
		&["xdg-open", "gio", "sensible-browser", "x-www-browser"]
	};

	candidates.iter().find(|c| which::which(c).is_ok()).map(|program| match *program {
		"gio" => OpenerCommand::new("gio", &["open"]),
		other => OpenerCommand::new(other, &[]),
	})
}

// Hands the URL to the shell protocol handler as one argument. Going
// through `cmd /C start` would let `&` or `|` in a query run commands.
fn windows_opener() -> OpenerCommand {
	OpenerCommand::new("rundll32", &["url.dll,FileProtocolHandler"])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn web_urls_are_accepted() {
		let url = parse_web_url("https://console.aws.amazon.com/?region=eu-west-1").unwrap();
		assert_eq!(url.host_str(), Some("console.aws.amazon.com"));
	}

	#[test]
	fn non_web_schemes_are_rejected() {
		let err = parse_web_url("javascript:alert(1)").unwrap_err();
		assert!(err.to_string().contains("unsupported scheme `javascript`"));
		assert!(matches!(parse_web_url("not a url"), Err(IoError::InvalidUrl { .. })));
	}

	#[test]
	fn render_appends_url_after_args() {
		let cmd = OpenerCommand::new("gio", &["open"]);
		assert_eq!(cmd.render("https://x"), "gio open https://x");
	}

	#[test]
	fn windows_opener_passes_url_without_a_shell() {
		let cmd = windows_opener();
		assert_eq!(cmd.program, "rundll32");
		assert_eq!(cmd.args, ["url.dll,FileProtocolHandler"]);

		let url = parse_web_url("https://x/?a=1&calc").unwrap();
		assert_eq!(url.as_str(), "https://x/?a=1&calc");
		assert_eq!(cmd.render(url.as_str()), "rundll32 url.dll,FileProtocolHandler https://x/?a=1&calc");
	}
}
