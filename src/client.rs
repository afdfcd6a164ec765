//! The client.
//!
//! [`SteamApi`] owns the [`Session`] and the send queue, and runs the response dispatch loop:
//! build a request from the current session, hand it to the transport, parse the body, dispatch
//! to the operation's parse callback, and either return the result or — when the server reports
//! the session expired — re-logon and resubmit the request transparently.

use std::fmt;

use futures::future;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::message::{Message, OutgoingMessage};
use crate::parse::{self, Outcome};
use crate::request::{self, ApiRequest, Operation};
use crate::session::Session;
use crate::summary::Summary;
use crate::transport::{HttpTransport, Transport, TransportError};

/// Whether an operation goes through the FIFO send queue.
///
/// Only message sends are queued, to preserve conversational ordering; everything else may be in
/// flight concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueMode {
	/// Dispatch immediately.
	Direct,

	/// The caller holds the send queue permit for the duration of the operation.
	Queued,
}

/// An asynchronous client for Steam's Web-chat API.
///
/// One instance corresponds to one logged-in account. All methods take `&self` and may be used
/// concurrently; message sends are serialized through an internal FIFO queue.
pub struct SteamApi<T = HttpTransport> {
	/// The HTTP transport.
	transport: T,

	/// The per-account session state.
	session: Mutex<Session>,

	/// The send queue.
	///
	/// [`tokio::sync::Mutex`] is fair, so queued sends are dispatched strictly in submission
	/// order, one at a time. Holding the lock across a re-logon is what "pausing the queue"
	/// means.
	send_queue: Mutex<()>,
}

impl<T> fmt::Debug for SteamApi<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SteamApi").finish_non_exhaustive()
	}
}

impl SteamApi {
	/// Creates a new [`SteamApi`] with the default HTTP transport.
	///
	/// If `umqid` is [`None`], a random one is generated.
	pub fn new(umqid: Option<&str>) -> Result<Self, TransportError> {
		Ok(Self::with_transport(HttpTransport::new()?, umqid))
	}

	/// Creates a new [`SteamApi`] with the default HTTP transport and a custom [`Config`].
	pub fn with_config(config: Config, umqid: Option<&str>) -> Result<Self, TransportError> {
		Ok(Self::with_transport(HttpTransport::with_config(config)?, umqid))
	}
}

impl<T: Transport> SteamApi<T> {
	/// Creates a new [`SteamApi`] on top of a custom [`Transport`].
	pub fn with_transport(transport: T, umqid: Option<&str>) -> Self {
		Self {
			transport,
			session: Mutex::new(Session::new(umqid)),
			send_queue: Mutex::new(()),
		}
	}

	/// A snapshot of the current session state.
	pub async fn session(&self) -> Session {
		self.session.lock().await.clone()
	}

	/// Exchanges account credentials for an access token.
	///
	/// If Steam asks for an email Steam Guard code, this fails with an error for which
	/// [`Error::requires_guard_code()`] returns `true`; retry with the code the user received.
	#[tracing::instrument(level = "debug", skip_all)]
	pub async fn authenticate(
		&self,
		username: &str,
		password: &str,
		guard_code: Option<&str>,
	) -> Result<()> {
		self.perform(
			Operation::Auth,
			QueueMode::Direct,
			|_| request::auth(username, password, guard_code),
			|session, json| Outcome::Deliver(parse::auth(session, json)),
		)
		.await
	}

	/// Establishes a presence session.
	///
	/// Must be called after [`authenticate`] and before messaging or polling.
	///
	/// [`authenticate`]: SteamApi::authenticate()
	#[tracing::instrument(level = "debug", skip_all)]
	pub async fn logon(&self) -> Result<()> {
		self.perform(
			Operation::Logon,
			QueueMode::Direct,
			request::logon,
			|session, json| Outcome::Deliver(parse::logon(session, json)),
		)
		.await
	}

	/// Tears down the presence session.
	#[tracing::instrument(level = "debug", skip_all)]
	pub async fn logoff(&self) -> Result<()> {
		self.perform(
			Operation::Logoff,
			QueueMode::Direct,
			request::logoff,
			|_, json| Outcome::Deliver(parse::logoff(json)),
		)
		.await
	}

	/// Sends a message.
	///
	/// Sends are queued: they are dispatched strictly in submission order with at most one in
	/// flight at a time, so messages arrive in the order they were sent.
	#[tracing::instrument(level = "debug", skip_all, fields(to = message.to()))]
	pub async fn send_message(&self, message: &OutgoingMessage) -> Result<()> {
		let _queued = self.send_queue.lock().await;

		self.perform(
			Operation::Message,
			QueueMode::Queued,
			|session| request::message(session, message),
			|_, json| parse::message(json),
		)
		.await
	}

	/// Long-polls for new messages and events.
	///
	/// Resumes from the last message id seen by the previous poll (or logon). A server-side
	/// timeout is a normal, empty result.
	#[tracing::instrument(level = "debug", skip_all)]
	pub async fn poll(&self) -> Result<Vec<Message>> {
		self.perform(Operation::Poll, QueueMode::Direct, request::poll, parse::poll)
			.await
	}

	/// Fetches the SteamIDs of all friends of this account.
	#[tracing::instrument(level = "debug", skip_all)]
	pub async fn friends(&self) -> Result<Vec<String>> {
		self.perform(
			Operation::Friends,
			QueueMode::Direct,
			request::friends,
			|_, json| Outcome::Deliver(parse::friends(json)),
		)
		.await
	}

	/// Fetches profile summaries for the given accounts.
	///
	/// The id list is split into groups of at most 100; each group is issued as its own request,
	/// all of them eagerly and concurrently. An empty input makes no requests at all. Failed
	/// groups are logged and skipped; an error is returned only if no group produced anything.
	#[tracing::instrument(level = "debug", skip_all, fields(count = steam_ids.len()))]
	pub async fn fetch_summaries(&self, steam_ids: &[String]) -> Result<Vec<Summary>> {
		if steam_ids.is_empty() {
			return Ok(Vec::new());
		}

		let chunks = request::summaries_chunks(steam_ids).collect::<Vec<_>>();

		let results = future::join_all(chunks.iter().map(|chunk| {
			self.perform(
				Operation::Summaries,
				QueueMode::Direct,
				move |session| request::summaries(session, chunk),
				|_, json| Outcome::Deliver(parse::summaries(json)),
			)
		}))
		.await;

		let mut summaries = Vec::new();
		let mut first_error = None;

		for result in results {
			match result {
				Ok(mut chunk) => summaries.append(&mut chunk),
				Err(error) => {
					tracing::warn!(%error, "summaries chunk failed");
					first_error.get_or_insert(error);
				}
			}
		}

		match first_error {
			Some(error) if summaries.is_empty() => Err(error),
			_ => Ok(summaries),
		}
	}

	/// Fetches the profile summary of a single account.
	#[tracing::instrument(level = "debug", skip_all, fields(steam_id))]
	pub async fn fetch_summary(&self, steam_id: &str) -> Result<Summary> {
		self.perform(
			Operation::Summaries,
			QueueMode::Direct,
			|session| request::summaries(session, steam_id),
			|_, json| Outcome::Deliver(parse::summaries(json)),
		)
		.await?
		.into_iter()
		.next()
		.ok_or_else(|| Error::new(Operation::Summaries, ErrorKind::SummariesEmpty))
	}

	/// The dispatch loop shared by every operation.
	///
	/// Rebuilds the request from the session on every attempt, so a resubmission after re-logon
	/// picks up refreshed session state rather than replaying stale bytes.
	async fn perform<R>(
		&self,
		operation: Operation,
		queue_mode: QueueMode,
		build: impl Fn(&Session) -> ApiRequest,
		parse: impl Fn(&mut Session, &Value) -> Outcome<R>,
	) -> Result<R> {
		loop {
			let request = {
				let session = self.session.lock().await;
				build(&session)
			};

			let json = self.execute(operation, &request).await?;
			let mut session = self.session.lock().await;

			match parse(&mut session, &json) {
				Outcome::Deliver(Ok(result)) => return Ok(result),
				Outcome::Deliver(Err(kind)) => return Err(Error::new(operation, kind)),
				Outcome::Resubmit => {
					drop(session);

					tracing::debug!(%operation, "session expired; logging on again");

					// A queued operation already holds the send queue permit, which is
					// exactly the paused state; pausing again would deadlock.
					self.relogon(queue_mode == QueueMode::Direct).await;
				}
			}
		}
	}

	/// Sends one request and parses the body as JSON.
	async fn execute(&self, operation: Operation, request: &ApiRequest) -> Result<Value> {
		let body = self
			.transport
			.send(request)
			.await
			.map_err(|error| Error::new(operation, ErrorKind::Transport(error)))?;

		serde_json::from_str(&body).map_err(|error| Error::new(operation, ErrorKind::Parser(error)))
	}

	/// Re-establishes the presence session after the server reported it expired.
	///
	/// Pauses the send queue for the duration of the request when asked to, and unpauses it
	/// before the result is even inspected — a failed re-logon leaves the queue running and the
	/// resubmitted request surfaces its own error.
	///
	/// There is no caller-visible result and no retry bound; this mirrors the protocol's
	/// behavior of resubmitting once per detected expiry.
	async fn relogon(&self, pause_queue: bool) {
		let paused = match pause_queue {
			true => Some(self.send_queue.lock().await),
			false => None,
		};

		let request = {
			let session = self.session.lock().await;
			request::relogon(&session)
		};

		let result = self
			.execute(Operation::Relogon, &request)
			.await
			.and_then(|json| {
				parse::relogon(&json).map_err(|kind| Error::new(Operation::Relogon, kind))
			});

		drop(paused);

		if let Err(error) = result {
			tracing::warn!(%error, "failed to re-establish session");
		}
	}
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
	use std::collections::VecDeque;
	use std::sync::Mutex as StdMutex;

	use super::*;

	/// A [`Transport`] replaying canned response bodies in order.
	struct MockTransport {
		responses: StdMutex<VecDeque<Result<String, String>>>,
		requests: StdMutex<Vec<ApiRequest>>,
	}

	impl MockTransport {
		fn new<const N: usize>(responses: [Result<&str, &str>; N]) -> Self {
			Self {
				responses: StdMutex::new(
					responses
						.into_iter()
						.map(|response| {
							response.map(ToOwned::to_owned).map_err(ToOwned::to_owned)
						})
						.collect(),
				),
				requests: StdMutex::new(Vec::new()),
			}
		}

		fn requests(&self) -> Vec<ApiRequest> {
			self.requests.lock().expect("not poisoned").clone()
		}
	}

	impl Transport for MockTransport {
		async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
			self.requests
				.lock()
				.expect("not poisoned")
				.push(request.clone());

			self.responses
				.lock()
				.expect("not poisoned")
				.pop_front()
				.unwrap_or(Err(String::from("no response scripted for this request")))
				.map_err(TransportError::new)
		}
	}

	fn client<const N: usize>(responses: [Result<&str, &str>; N]) -> SteamApi<MockTransport> {
		SteamApi::with_transport(MockTransport::new(responses), Some("654321"))
	}

	fn param<'r>(request: &'r ApiRequest, name: &str) -> Option<&'r str> {
		request
			.params
			.iter()
			.find(|(n, _)| *n == name)
			.map(|(_, value)| value.as_str())
	}

	#[tokio::test]
	async fn authenticate_stores_token_for_later_requests() {
		let api = client([
			Ok(r#"{ "access_token": "tok" }"#),
			Ok(r#"{ "error": "OK", "umqid": "654321", "steamid": "76561198282622073" }"#),
		]);

		api.authenticate("user", "hunter2", None)
			.await
			.expect("authentication succeeds");
		api.logon().await.expect("logon succeeds");

		let requests = api.transport.requests();

		assert_eq!(requests.len(), 2);
		assert_eq!(param(&requests[1], "access_token"), Some("tok"));
		assert_eq!(api.session().await.steam_id(), Some("76561198282622073"));
	}

	#[tokio::test]
	async fn guard_code_sentinel_is_surfaced() {
		let api = client([Ok(
			r#"{ "x_errorcode": "steamguard_code_required", "error_description": "need code" }"#,
		)]);

		let error = api
			.authenticate("user", "hunter2", None)
			.await
			.expect_err("no token in response");

		assert!(error.requires_guard_code());
		assert_eq!(error.to_string(), "Authentication: need code");
	}

	#[tokio::test]
	async fn expired_session_during_send_is_recovered_transparently() {
		let api = client([
			Ok(r#"{ "error": "Not Logged On" }"#),
			Ok(r#"{ "error": "OK" }"#),
			Ok(r#"{ "error": "OK" }"#),
		]);

		api.send_message(&OutgoingMessage::Say {
			to: String::from("76561198000000000"),
			text: String::from("hi"),
		})
		.await
		.expect("the resubmitted send succeeds");

		let requests = api.transport.requests();

		assert_eq!(requests.len(), 3);
		assert_eq!(requests[0].path, "/ISteamWebUserPresenceOAuth/Message/v0001");
		assert_eq!(requests[1].path, "/ISteamWebUserPresenceOAuth/Logon/v0001");
		assert_eq!(requests[2], requests[0]);
	}

	#[tokio::test]
	async fn expired_session_during_poll_is_recovered_transparently() {
		let api = client([
			Ok(r#"{ "error": "Not Logged On" }"#),
			Ok(r#"{ "error": "OK" }"#),
			Ok(r#"{ "error": "OK", "messagelast": 5, "messages": [] }"#),
		]);

		let messages = api.poll().await.expect("the resubmitted poll succeeds");

		assert!(messages.is_empty());
		assert_eq!(api.session().await.last_message_id(), 5);

		let requests = api.transport.requests();

		assert_eq!(requests.len(), 3);
		assert_eq!(requests[1].path, "/ISteamWebUserPresenceOAuth/Logon/v0001");
	}

	#[tokio::test]
	async fn failed_relogon_still_resubmits_and_surfaces_the_final_error() {
		let api = client([
			Ok(r#"{ "error": "Not Logged On" }"#),
			Ok(r#"{ "error": "Access Denied" }"#),
			Ok(r#"{ "error": "Rate Limited" }"#),
		]);

		let error = api
			.send_message(&OutgoingMessage::Typing {
				to: String::from("76561198000000000"),
			})
			.await
			.expect_err("the resubmitted send fails");

		assert_eq!(error.to_string(), "Message: Rate Limited");
		assert_eq!(api.transport.requests().len(), 3);
	}

	#[tokio::test]
	async fn summaries_are_chunked_by_one_hundred_ids() {
		let api = client([
			Ok(r#"{ "players": [{ "steamid": "0" }] }"#),
			Ok(r#"{ "players": [{ "steamid": "100" }] }"#),
		]);

		let ids = (0..150).map(|id| id.to_string()).collect::<Vec<_>>();
		let summaries = api.fetch_summaries(&ids).await.expect("both chunks succeed");

		assert_eq!(summaries.len(), 2);

		let requests = api.transport.requests();

		assert_eq!(requests.len(), 2);
		assert_eq!(
			param(&requests[0], "steamids").map(|ids| ids.split(',').count()),
			Some(100),
		);
		assert_eq!(
			param(&requests[1], "steamids").map(|ids| ids.split(',').count()),
			Some(50),
		);
	}

	#[tokio::test]
	async fn empty_summaries_input_makes_no_requests() {
		let api = client([]);

		let summaries = api.fetch_summaries(&[]).await.expect("nothing to fetch");

		assert!(summaries.is_empty());
		assert_eq!(api.transport.requests().len(), 0);
	}

	#[tokio::test]
	async fn partially_failed_summaries_still_deliver() {
		let api = client([
			Ok(r#"{ "players": [{ "steamid": "0", "personastate": 1 }] }"#),
			Ok(r#"{ "players": [] }"#),
		]);

		let ids = (0..150).map(|id| id.to_string()).collect::<Vec<_>>();
		let summaries = api.fetch_summaries(&ids).await.expect("one chunk succeeded");

		assert_eq!(summaries.len(), 1);
		assert_eq!(summaries[0].steam_id, "0");
	}

	#[tokio::test]
	async fn fully_failed_summaries_surface_the_first_error() {
		let api = client([Ok(r#"{ "players": [] }"#)]);

		let error = api
			.fetch_summaries(&[String::from("1")])
			.await
			.expect_err("no players returned");

		assert_eq!(error.to_string(), "Summaries: No friends returned");
	}

	#[tokio::test]
	async fn friends_come_back_filtered() {
		let api = client([Ok(
			r#"{
				"friends": [
					{ "steamid": "1", "relationship": "friend" },
					{ "steamid": "2", "relationship": "requestrecipient" }
				]
			}"#,
		)]);

		let friends = api.friends().await.expect("one friend");

		assert_eq!(friends, ["1"]);
	}

	#[tokio::test]
	async fn transport_errors_carry_the_operation_prefix() {
		let api = client([Err("connection reset by peer")]);

		let error = api.poll().await.expect_err("transport failed");

		assert_eq!(error.to_string(), "Polling: connection reset by peer");
	}

	#[tokio::test]
	async fn malformed_bodies_are_parser_errors() {
		let api = client([Ok("<html>not json</html>")]);

		let error = api.logoff().await.expect_err("body is not json");

		assert!(matches!(error.kind(), ErrorKind::Parser(_)));
		assert!(error.to_string().starts_with("Logoff: Parser: "));
	}
}
