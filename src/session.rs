//! Per-account session state.
//!
//! A [`Session`] holds everything the request builders need to talk to Steam on behalf of one
//! logged-in account. It is owned by the client and mutated only from within parse callbacks
//! (and [`Session::set_token`] during authentication), so there is exactly one writer at a time.

use rand::Rng;

/// The mutable credential/identity state for one logged-in account.
#[derive(Debug, Clone)]
pub struct Session {
	/// OAuth access token, set by a successful authentication.
	token: Option<String>,

	/// The message queue id ("umqid") grouping this logon session's message stream.
	///
	/// Chosen randomly by the client, but the server may overwrite it on logon.
	umqid: String,

	/// The account's SteamID, set on first logon and possibly corrected by the server.
	steam_id: Option<String>,

	/// The last message id seen by a logon or poll response.
	///
	/// Used to resume polling where the previous poll left off. Never decreases.
	last_message_id: i64,
}

impl Session {
	/// Creates a new [`Session`].
	///
	/// If `umqid` is [`None`], a random one is generated.
	pub fn new(umqid: Option<&str>) -> Self {
		let umqid = match umqid {
			Some(umqid) => umqid.to_owned(),
			None => rand::thread_rng().gen::<u32>().to_string(),
		};

		Self {
			token: None,
			umqid,
			steam_id: None,
			last_message_id: 0,
		}
	}

	/// The access token, or an empty string if we have not authenticated yet.
	pub fn token(&self) -> &str {
		self.token.as_deref().unwrap_or_default()
	}

	/// The message queue id.
	pub fn umqid(&self) -> &str {
		&self.umqid
	}

	/// The account's SteamID, if known.
	pub fn steam_id(&self) -> Option<&str> {
		self.steam_id.as_deref()
	}

	/// The last message id seen by a logon or poll response.
	pub fn last_message_id(&self) -> i64 {
		self.last_message_id
	}

	/// Stores a fresh access token.
	pub(crate) fn set_token(&mut self, token: impl Into<String>) {
		self.token = Some(token.into());
	}

	/// Overwrites the message queue id with a server-supplied one.
	pub(crate) fn set_umqid(&mut self, umqid: impl Into<String>) {
		self.umqid = umqid.into();
	}

	/// Stores the account's SteamID as reported by the server.
	pub(crate) fn set_steam_id(&mut self, steam_id: impl Into<String>) {
		self.steam_id = Some(steam_id.into());
	}

	/// Advances the last seen message id.
	///
	/// Ignores values that would move the counter backwards.
	pub(crate) fn update_last_message_id(&mut self, last_message_id: i64) {
		if last_message_id > self.last_message_id {
			self.last_message_id = last_message_id;
		}
	}
}
