//! Request construction.
//!
//! Every server capability has exactly one builder function in this module. Builders read the
//! [`Session`] and their arguments, and produce an [`ApiRequest`] — a transport-agnostic
//! description of the HTTP request (path, method, parameters, headers). They never perform I/O.

use std::fmt::{self, Display, Formatter};

use crate::message::OutgoingMessage;
use crate::session::Session;

/// OAuth client id used by the mobile chat client.
const CLIENT_ID: &str = "DE45CD61";

/// OAuth scopes requested during authentication.
const SCOPE: &str = "read_profile write_profile read_client write_client";

/// The response format selector sent with every request.
const FORMAT: &str = "json";

/// Keep-alive timeout (in seconds) requested by poll requests.
const KEEP_ALIVE_SECS: u64 = 25;

/// `User-Agent` sent with regular requests.
const USER_AGENT: &str = concat!("steam-chat/", env!("CARGO_PKG_VERSION"));

/// `User-Agent` sent with authentication requests.
///
/// The token endpoint rejects unknown clients, so we identify as the mobile app there.
const AUTH_USER_AGENT: &str = "Steam App / Mobile / 1.0";

/// Maximum number of ids per summaries request.
pub(crate) const SUMMARIES_CHUNK_SIZE: usize = 100;

/// The operations this client can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	/// Exchange account credentials for an access token.
	Auth,

	/// Fetch the friend list.
	Friends,

	/// Establish a presence session.
	Logon,

	/// Re-establish a presence session after the server reported it expired.
	Relogon,

	/// Tear down the presence session.
	Logoff,

	/// Send a message.
	Message,

	/// Long-poll for events.
	Poll,

	/// Fetch profile summaries.
	Summaries,
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Auth => "Authentication",
			Self::Friends => "Friends",
			Self::Logon => "Logon",
			Self::Relogon => "Relogon",
			Self::Logoff => "Logoff",
			Self::Message => "Message",
			Self::Poll => "Polling",
			Self::Summaries => "Summaries",
		})
	}
}

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	/// Parameters go into the query string.
	Get,

	/// Parameters go into a url-encoded form body.
	Post,
}

/// A transport-agnostic description of one HTTP request against the Steam Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
	/// The path of the endpoint, relative to the API base URL.
	pub path: &'static str,

	/// The HTTP method.
	pub method: Method,

	/// Request parameters (query string for GET, form body for POST).
	pub params: Vec<(&'static str, String)>,

	/// Extra headers.
	pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
	/// Creates a new [`ApiRequest`] with the `format` parameter and default `User-Agent` already
	/// in place.
	fn new(path: &'static str, method: Method) -> Self {
		Self {
			path,
			method,
			params: vec![("format", String::from(FORMAT))],
			headers: vec![("User-Agent", String::from(USER_AGENT))],
		}
	}

	/// Appends a parameter.
	fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.params.push((name, value.into()));
		self
	}

	/// Overrides or appends a header.
	fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		if let Some(header) = self.headers.iter_mut().find(|(n, _)| *n == name) {
			header.1 = value.into();
		} else {
			self.headers.push((name, value.into()));
		}

		self
	}
}

/// Builds an authentication request.
pub(crate) fn auth(username: &str, password: &str, guard_code: Option<&str>) -> ApiRequest {
	ApiRequest::new("/ISteamOAuth2/GetTokenWithCredentials/v0001", Method::Post)
		.header("User-Agent", AUTH_USER_AGENT)
		.param("client_id", CLIENT_ID)
		.param("grant_type", "password")
		.param("username", username)
		.param("password", password)
		.param("x_emailauthcode", guard_code.unwrap_or_default())
		.param("x_webcookie", "")
		.param("scope", SCOPE)
}

/// Builds a friend list request.
pub(crate) fn friends(session: &Session) -> ApiRequest {
	ApiRequest::new("/ISteamUserOAuth/GetFriendList/v0001", Method::Get)
		.param("access_token", session.token())
		.param("steamid", session.steam_id().unwrap_or_default())
		.param("relationship", "friend")
}

/// Builds a logon request.
pub(crate) fn logon(session: &Session) -> ApiRequest {
	ApiRequest::new("/ISteamWebUserPresenceOAuth/Logon/v0001", Method::Post)
		.param("access_token", session.token())
		.param("umqid", session.umqid())
}

/// Builds a re-logon request.
///
/// Identical on the wire to [`logon`]; only the parse callback and queue handling differ.
pub(crate) fn relogon(session: &Session) -> ApiRequest {
	logon(session)
}

/// Builds a logoff request.
pub(crate) fn logoff(session: &Session) -> ApiRequest {
	ApiRequest::new("/ISteamWebUserPresenceOAuth/Logoff/v0001", Method::Post)
		.param("access_token", session.token())
		.param("umqid", session.umqid())
}

/// Builds a message send request.
pub(crate) fn message(session: &Session, message: &OutgoingMessage) -> ApiRequest {
	let request = ApiRequest::new("/ISteamWebUserPresenceOAuth/Message/v0001", Method::Post)
		.param("access_token", session.token())
		.param("umqid", session.umqid())
		.param("steamid_dst", message.to())
		.param("type", message.kind().wire_name());

	match message.text() {
		Some(text) => request.param("text", text),
		None => request,
	}
}

/// Builds a poll request.
pub(crate) fn poll(session: &Session) -> ApiRequest {
	ApiRequest::new("/ISteamWebUserPresenceOAuth/Poll/v0001", Method::Post)
		.header("Connection", "Keep-Alive")
		.param("access_token", session.token())
		.param("umqid", session.umqid())
		.param("message", session.last_message_id().to_string())
		.param("sectimeout", KEEP_ALIVE_SECS.to_string())
}

/// Builds a summaries request for one comma-joined chunk of ids.
pub(crate) fn summaries(session: &Session, steam_ids: &str) -> ApiRequest {
	ApiRequest::new("/ISteamUserOAuth/GetUserSummaries/v0001", Method::Get)
		.param("access_token", session.token())
		.param("steamids", steam_ids)
}

/// Splits `steam_ids` into comma-joined groups of at most [`SUMMARIES_CHUNK_SIZE`] ids.
pub(crate) fn summaries_chunks(steam_ids: &[String]) -> impl Iterator<Item = String> + '_ {
	steam_ids
		.chunks(SUMMARIES_CHUNK_SIZE)
		.map(|chunk| chunk.join(","))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
	use super::*;
	use crate::message::OutgoingMessage;

	fn session() -> Session {
		let mut session = Session::new(Some("654321"));
		session.set_token("token");
		session.set_steam_id("76561198282622073");
		session
	}

	fn param<'r>(request: &'r ApiRequest, name: &str) -> Option<&'r str> {
		request
			.params
			.iter()
			.find(|(n, _)| *n == name)
			.map(|(_, value)| value.as_str())
	}

	#[test]
	fn every_request_selects_json() {
		let session = session();

		for request in [
			auth("user", "hunter2", None),
			friends(&session),
			logon(&session),
			logoff(&session),
			poll(&session),
			summaries(&session, "1,2"),
		] {
			assert_eq!(param(&request, "format"), Some("json"));
		}
	}

	#[test]
	fn auth_uses_a_distinct_user_agent() {
		let request = auth("user", "hunter2", Some("ABC12"));

		assert_eq!(request.method, Method::Post);
		assert_eq!(request.headers, vec![("User-Agent", String::from(AUTH_USER_AGENT))]);
		assert_eq!(param(&request, "grant_type"), Some("password"));
		assert_eq!(param(&request, "x_emailauthcode"), Some("ABC12"));
	}

	#[test]
	fn friends_filters_by_relationship() {
		let request = friends(&session());

		assert_eq!(request.method, Method::Get);
		assert_eq!(param(&request, "relationship"), Some("friend"));
		assert_eq!(param(&request, "steamid"), Some("76561198282622073"));
	}

	#[test]
	fn say_messages_carry_text() {
		let request = message(&session(), &OutgoingMessage::Say {
			to: String::from("76561198000000000"),
			text: String::from("hi"),
		});

		assert_eq!(param(&request, "type"), Some("saytext"));
		assert_eq!(param(&request, "text"), Some("hi"));
	}

	#[test]
	fn typing_messages_have_no_text() {
		let request = message(&session(), &OutgoingMessage::Typing {
			to: String::from("76561198000000000"),
		});

		assert_eq!(param(&request, "type"), Some("typing"));
		assert_eq!(param(&request, "text"), None);
	}

	#[test]
	fn poll_resumes_from_last_message_id() {
		let mut session = session();
		session.update_last_message_id(42);

		let request = poll(&session);

		assert_eq!(param(&request, "message"), Some("42"));
		assert!(request
			.headers
			.iter()
			.any(|(name, value)| *name == "Connection" && value == "Keep-Alive"));
	}

	#[test]
	fn chunks_are_bounded_by_one_hundred_ids() {
		let ids = (0..250).map(|id| id.to_string()).collect::<Vec<_>>();
		let chunks = summaries_chunks(&ids).collect::<Vec<_>>();

		assert_eq!(chunks.len(), 3);
		assert_eq!(chunks[0].split(',').count(), 100);
		assert_eq!(chunks[2].split(',').count(), 50);
	}
}
