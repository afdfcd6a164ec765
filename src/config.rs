//! Transport configuration.

use std::time::Duration;

use url::Url;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct Config {
	/// Base URL of the Steam Web API.
	pub api_url: Url,

	/// Timeout applied to every request.
	///
	/// Must exceed the keep-alive timeout requested by poll requests, or long-polls will
	/// spuriously fail.
	pub timeout: Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_url: Url::parse("https://api.steampowered.com").expect("hard-coded URL is valid"),
			timeout: Duration::from_secs(60),
		}
	}
}
