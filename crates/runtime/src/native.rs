//! Native HTTP collaborators for the desktop and CLI deployment forms.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{IoError, Result};
use crate::platform::parse_web_url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Body and metadata of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
	/// Final URL after redirects.
	pub url: String,
	pub status: u16,
	pub content_type: Option<String>,
	pub body: String,
}

impl FetchResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Native I/O surface a host exposes to plugins.
#[async_trait]
pub trait NativeIo: Send + Sync {
	/// Issues a GET request and returns the response body as text.
	async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

#[derive(Debug, Clone)]
struct HttpFetcher {
	client: reqwest::Client,
}

impl HttpFetcher {
	fn new(user_agent: &str) -> Result<Self> {
		let client = reqwest::Client::builder()
			.user_agent(user_agent)
			.timeout(FETCH_TIMEOUT)
			.build()
			.map_err(IoError::Client)?;
		Ok(Self { client })
	}

	async fn get(&self, url: &str) -> Result<FetchResponse> {
		let parsed = parse_web_url(url)?;
		let http_err = |source| IoError::Http { url: url.to_string(), source };

		let response = self.client.get(parsed).send().await.map_err(http_err)?;
		let status = response.status().as_u16();
		let final_url = response.url().to_string();
		let content_type = response
			.headers()
			.get(reqwest::header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		let body = response.text().await.map_err(http_err)?;

		debug!(target: "keel.runtime", %url, status, bytes = body.len(), "fetch completed");
		Ok(FetchResponse {
			url: final_url,
			status,
			content_type,
			body,
		})
	}
}

/// Native I/O used when the host runs inside the desktop app.
#[derive(Debug, Clone)]
pub struct DesktopNative {
	http: HttpFetcher,
}

impl DesktopNative {
	pub fn new() -> Result<Self> {
		Ok(Self {
			http: HttpFetcher::new(concat!("keel-desktop/", env!("CARGO_PKG_VERSION")))?,
		})
	}
}

#[async_trait]
impl NativeIo for DesktopNative {
	async fn fetch(&self, url: &str) -> Result<FetchResponse> {
		self.http.get(url).await
	}
}

/// Native I/O used when the host runs as a command-line tool.
#[derive(Debug, Clone)]
pub struct CliNative {
	http: HttpFetcher,
}

impl CliNative {
	pub fn new() -> Result<Self> {
		Ok(Self {
			http: HttpFetcher::new(concat!("keel-cli/", env!("CARGO_PKG_VERSION")))?,
		})
	}
}

#[async_trait]
impl NativeIo for CliNative {
	async fn fetch(&self, url: &str) -> Result<FetchResponse> {
		self.http.get(url).await
	}
}
