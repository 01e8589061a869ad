//! External URL openers for the desktop and CLI deployment forms.

use std::io::Write;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{IoError, Result};
use crate::platform::{OpenerCommand, find_url_opener, parse_web_url};

/// Opens a URL outside the host process, typically in a browser.
pub trait ExternalUrlOpener: Send + Sync {
	fn open_external_url(&self, url: &str) -> Result<()>;
}

/// Desktop opener: pops a new browser window through the system opener.
#[derive(Debug, Clone)]
pub struct WindowService {
	opener: Option<OpenerCommand>,
}

impl WindowService {
	/// Resolves the platform opener once at construction.
	pub fn detect() -> Self {
		Self { opener: find_url_opener() }
	}

	pub fn with_opener(opener: Option<OpenerCommand>) -> Self {
		Self { opener }
	}
}

impl ExternalUrlOpener for WindowService {
	fn open_external_url(&self, url: &str) -> Result<()> {
		let parsed = parse_web_url(url)?;
		let Some(opener) = &self.opener else {
			return Err(IoError::NoOpener(parsed.to_string()));
		};
		info!(target: "keel.runtime", %url, program = %opener.program, "opening browser window");
		opener.spawn(parsed.as_str())
	}
}

/// CLI opener: prints the launch command and spawns it when an opener exists.
///
/// Without a system opener the URL is printed for the operator to follow.
pub struct CliWebConsole {
	out: Mutex<Box<dyn Write + Send>>,
	opener: Option<OpenerCommand>,
}

impl CliWebConsole {
	/// Writes to stderr and uses the detected platform opener.
	pub fn stderr() -> Self {
		Self::with_writer(Box::new(std::io::stderr()), find_url_opener())
	}

	pub fn with_writer(out: Box<dyn Write + Send>, opener: Option<OpenerCommand>) -> Self {
		Self {
			out: Mutex::new(out),
			opener,
		}
	}

	fn say(&self, line: &str) -> Result<()> {
		let mut out = self.out.lock();
		writeln!(out, "{line}").and_then(|_| out.flush()).map_err(IoError::Console)
	}
}

impl std::fmt::Debug for CliWebConsole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CliWebConsole").field("opener", &self.opener).finish_non_exhaustive()
	}
}

impl ExternalUrlOpener for CliWebConsole {
	fn open_external_url(&self, url: &str) -> Result<()> {
		let parsed = parse_web_url(url)?;
		match &self.opener {
			Some(opener) => {
				self.say(&format!("Opening: {}", opener.render(parsed.as_str())))?;
				opener.spawn(parsed.as_str())
			}
			None => {
				debug!(target: "keel.runtime", %url, "no system opener; printing URL");
				self.say(&format!("Open this URL in your browser:\n  {}", parsed))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;

	#[derive(Clone, Default)]
	struct SharedBuf(Arc<Mutex<Vec<u8>>>);

	impl Write for SharedBuf {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	impl SharedBuf {
		fn contents(&self) -> String {
			String::from_utf8_lossy(&self.0.lock()).to_string()
		}
	}

	#[test]
	fn cli_console_prints_url_without_opener() {
		let buf = SharedBuf::default();
		let console = CliWebConsole::with_writer(Box::new(buf.clone()), None);
		console.open_external_url("https://signin.aws.amazon.com/federation").unwrap();
		let printed = buf.contents();
		assert!(printed.contains("Open this URL in your browser:"));
		assert!(printed.contains("https://signin.aws.amazon.com/federation"));
	}

	#[test]
	fn cli_console_rejects_invalid_url_before_printing() {
		let buf = SharedBuf::default();
		let console = CliWebConsole::with_writer(Box::new(buf.clone()), None);
		assert!(console.open_external_url("ftp://example.com").is_err());
		assert!(buf.contents().is_empty());
	}

	#[test]
	fn window_service_without_opener_reports_url() {
		let err = WindowService::with_opener(None).open_external_url("https://example.com/").unwrap_err();
		assert!(matches!(err, IoError::NoOpener(ref url) if url == "https://example.com/"));
	}
}
