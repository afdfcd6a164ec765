//! The HTTP transport boundary.
//!
//! The dispatch layer only cares about turning an [`ApiRequest`] into a response body; everything
//! below that (connection pooling, TLS, timeouts) lives behind the [`Transport`] trait.
//! [`HttpTransport`] is the production implementation on top of [`reqwest`]; tests substitute
//! their own implementations replaying canned bodies.

use thiserror::Error as ThisError;
use url::Url;

use crate::config::Config;
use crate::request::{ApiRequest, Method};

/// An error reported by the transport (connection failure, timeout, non-2xx status, ...).
///
/// Transport errors are surfaced to callers unchanged, wrapped only in the operation prefix that
/// every error of this crate carries.
#[derive(Debug, ThisError)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
	/// Creates a new [`TransportError`] from any displayable cause.
	pub fn new(cause: impl std::fmt::Display) -> Self {
		Self(cause.to_string())
	}
}

impl From<reqwest::Error> for TransportError {
	fn from(error: reqwest::Error) -> Self {
		Self::new(error)
	}
}

/// Something that can deliver an [`ApiRequest`] and produce the raw response body.
#[allow(async_fn_in_trait)]
pub trait Transport {
	/// Sends `request` and resolves with the response body.
	async fn send(&self, request: &ApiRequest) -> Result<String, TransportError>;
}

/// The production [`Transport`] on top of [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
	/// Base URL the request paths are joined onto.
	api_url: Url,

	/// The underlying HTTP client.
	http_client: reqwest::Client,
}

impl HttpTransport {
	/// Creates a new [`HttpTransport`] with the default [`Config`].
	pub fn new() -> Result<Self, TransportError> {
		Self::with_config(Config::default())
	}

	/// Creates a new [`HttpTransport`] with the given [`Config`].
	pub fn with_config(config: Config) -> Result<Self, TransportError> {
		let http_client = reqwest::Client::builder()
			.timeout(config.timeout)
			.build()?;

		Ok(Self {
			api_url: config.api_url,
			http_client,
		})
	}
}

impl Transport for HttpTransport {
	async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
		let url = self
			.api_url
			.join(request.path)
			.map_err(TransportError::new)?;

		tracing::debug!(%url, method = ?request.method, "making http request to steam");

		let mut builder = match request.method {
			Method::Get => self.http_client.get(url).query(&request.params),
			Method::Post => self.http_client.post(url).form(&request.params),
		};

		for (name, value) in &request.headers {
			builder = builder.header(*name, value);
		}

		let response = builder.send().await?;

		if let Err(error) = response.error_for_status_ref() {
			let response_body = response.text().await.ok();

			tracing::error! {
				?error,
				?response_body,
				"steam responded with an error status",
			};

			return Err(error.into());
		}

		Ok(response.text().await?)
	}
}
