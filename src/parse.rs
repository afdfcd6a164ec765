//! Parse callbacks.
//!
//! One pure function per operation, each translating a parsed JSON document into either an
//! extracted result or an [`ErrorKind`]. The send-message and poll callbacks can additionally
//! decide that the whole request should be silently resubmitted after a re-logon; that decision
//! is expressed through [`Outcome`] and consumed by the dispatcher in [`crate::client`].
//!
//! The session-mutating callbacks (logon, poll, auth) take the [`Session`] by mutable reference;
//! everything else is read-only.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ErrorKind;
use crate::message::{Message, MessageKind};
use crate::session::Session;
use crate::state::SteamState;
use crate::summary::{RawSummary, Summary};

/// The decision a parse callback hands back to the dispatcher.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
	/// Deliver this result to the caller.
	Deliver(Result<T, ErrorKind>),

	/// The session expired. Do not deliver anything; re-logon and resubmit the request.
	Resubmit,
}

/// Extracts a string field from a JSON object.
fn str_field<'json>(json: &'json Value, name: &str) -> Option<&'json str> {
	json.get(name).and_then(Value::as_str)
}

/// Extracts an integer field from a JSON object.
///
/// Steam is inconsistent about whether counters arrive as JSON numbers or strings, so both are
/// accepted.
fn int_field(json: &Value, name: &str) -> Option<i64> {
	let value = json.get(name)?;

	value
		.as_i64()
		.or_else(|| value.as_str()?.parse().ok())
}

/// The `error` field, falling back to a placeholder when the server sent none.
fn error_field(json: &Value) -> &str {
	str_field(json, "error").unwrap_or("unknown error")
}

/// Parses an authentication response.
///
/// A successful response carries an `access_token`, which is stored in the session. Failures
/// distinguish the Steam Guard sentinel from everything else.
pub(crate) fn auth(session: &mut Session, json: &Value) -> Result<(), ErrorKind> {
	if let Some(token) = str_field(json, "access_token") {
		session.set_token(token);
		return Ok(());
	}

	let description = str_field(json, "error_description")
		.unwrap_or("unknown error")
		.to_owned();

	if str_field(json, "x_errorcode") == Some("steamguard_code_required") {
		Err(ErrorKind::AuthRequiresGuardCode(description))
	} else {
		Err(ErrorKind::AuthFailed(description))
	}
}

/// Parses a friend list response.
///
/// Only entries whose relationship is exactly `"friend"` are kept.
pub(crate) fn friends(json: &Value) -> Result<Vec<String>, ErrorKind> {
	let entries = json
		.get("friends")
		.and_then(Value::as_array)
		.ok_or(ErrorKind::FriendsEmpty)?;

	let friends = entries
		.iter()
		.filter(|entry| str_field(entry, "relationship") == Some("friend"))
		.filter_map(|entry| str_field(entry, "steamid"))
		.map(ToOwned::to_owned)
		.collect::<Vec<_>>();

	if friends.is_empty() {
		return Err(ErrorKind::FriendsEmpty);
	}

	Ok(friends)
}

/// Parses a logon response.
///
/// On success the session's last message id is advanced, and its SteamID and umqid are corrected
/// if the server reported different ones.
pub(crate) fn logon(session: &mut Session, json: &Value) -> Result<(), ErrorKind> {
	if error_field(json) != "OK" {
		return Err(ErrorKind::LogonFailed(error_field(json).to_owned()));
	}

	if let Some(last_message_id) = int_field(json, "message") {
		session.update_last_message_id(last_message_id);
	}

	if let Some(steam_id) = str_field(json, "steamid") {
		if session.steam_id() != Some(steam_id) {
			session.set_steam_id(steam_id);
		}
	}

	if let Some(umqid) = str_field(json, "umqid") {
		if session.umqid() != umqid {
			session.set_umqid(umqid);
		}
	}

	Ok(())
}

/// Parses a re-logon response.
///
/// Unlike [`logon`], this does not touch the session; the dispatcher unpauses the send queue
/// before this result is even inspected.
pub(crate) fn relogon(json: &Value) -> Result<(), ErrorKind> {
	if error_field(json) != "OK" {
		return Err(ErrorKind::RelogonFailed(error_field(json).to_owned()));
	}

	Ok(())
}

/// Parses a logoff response.
pub(crate) fn logoff(json: &Value) -> Result<(), ErrorKind> {
	if error_field(json) != "OK" {
		return Err(ErrorKind::LogoffFailed(error_field(json).to_owned()));
	}

	Ok(())
}

/// Parses a message send response.
pub(crate) fn message(json: &Value) -> Outcome<()> {
	let error = error_field(json);

	if error == "OK" {
		return Outcome::Deliver(Ok(()));
	}

	if error.eq_ignore_ascii_case("Not Logged On") {
		return Outcome::Resubmit;
	}

	Outcome::Deliver(Err(ErrorKind::MessageFailed(error.to_owned())))
}

/// Parses a poll response.
///
/// `messagelast` is applied to the session before anything else, including the error check, so
/// that the poll cursor advances even when the rest of the response is rejected. Malformed
/// entries are skipped, not fatal.
pub(crate) fn poll(session: &mut Session, json: &Value) -> Outcome<Vec<Message>> {
	if let Some(last_message_id) = int_field(json, "messagelast") {
		session.update_last_message_id(last_message_id);
	}

	if let Some(error) = str_field(json, "error") {
		if !error.eq_ignore_ascii_case("Timeout") && !error.eq_ignore_ascii_case("OK") {
			if error.eq_ignore_ascii_case("Not Logged On") {
				return Outcome::Resubmit;
			}

			return Outcome::Deliver(Err(ErrorKind::PollFailed(error.to_owned())));
		}
	}

	let Some(entries) = json.get("messages").and_then(Value::as_array) else {
		return Outcome::Deliver(Ok(Vec::new()));
	};

	let messages = entries
		.iter()
		.filter_map(|entry| poll_entry(entry, session.steam_id()))
		.collect();

	Outcome::Deliver(Ok(messages))
}

/// Parses one entry of a poll's `messages` array.
///
/// Returns [`None`] for entries that should be skipped: our own echoed messages, unknown kinds,
/// and entries missing a field their kind requires.
fn poll_entry(entry: &Value, own_steam_id: Option<&str>) -> Option<Message> {
	let from = str_field(entry, "steamid_from")?;

	if own_steam_id == Some(from) {
		return None;
	}

	let kind = MessageKind::from_wire_name(str_field(entry, "type")?)?;
	let from = from.to_owned();

	Some(match kind {
		MessageKind::SayText => Message::Say {
			from,
			text: str_field(entry, "text")?.to_owned(),
		},
		MessageKind::Emote => Message::Emote {
			from,
			text: str_field(entry, "text")?.to_owned(),
		},
		MessageKind::LeftConversation => Message::LeftConversation { from },
		MessageKind::Relationship => Message::Relationship {
			from,
			state: SteamState::from_code(int_field(entry, "persona_state")?),
		},
		MessageKind::State => Message::State {
			from,
			name: str_field(entry, "persona_name")?.to_owned(),
			state: SteamState::from_code(int_field(entry, "persona_state")?),
		},
		MessageKind::Typing => Message::Typing { from },
	})
}

/// Parses a summaries response.
///
/// Entries without a `steamid` are skipped; all other fields are optional.
pub(crate) fn summaries(json: &Value) -> Result<Vec<Summary>, ErrorKind> {
	let players = json
		.get("players")
		.and_then(Value::as_array)
		.ok_or(ErrorKind::SummariesEmpty)?;

	let summaries = players
		.iter()
		.filter_map(|entry| RawSummary::deserialize(entry).ok())
		.map(Summary::from)
		.collect::<Vec<_>>();

	if summaries.is_empty() {
		return Err(ErrorKind::SummariesEmpty);
	}

	Ok(summaries)
}
