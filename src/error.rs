//! Runtime errors.
//!
//! Every fallible operation in this crate reports an [`Error`], which pairs the operation that
//! failed with an [`ErrorKind`] describing what went wrong. The [`Display`] output is always
//! `"<operation>: <detail>"`, e.g. `"Polling: Not Logged On"`.
//!
//! This module also exposes a [`Result`] type alias, which sets [`Error`] as the default `E` type
//! parameter.
//!
//! [`Display`]: std::fmt::Display
//! [`Error`]: struct@Error

use std::fmt::{self, Display, Formatter};

use thiserror::Error as ThisError;

use crate::request::Operation;
use crate::transport::TransportError;

/// Type alias for a [`Result<T, E>`] with its `E` parameter set to [`Error`].
///
/// [`Result`]: std::result::Result
/// [`Error`]: struct@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The crate's core error type.
///
/// Carries the [`Operation`] during which the error occurred, so that every error message is
/// prefixed with a human readable operation name.
#[derive(Debug, ThisError)]
pub struct Error {
	/// The operation that failed.
	operation: Operation,

	/// What went wrong.
	#[source]
	kind: ErrorKind,
}

impl Error {
	/// Creates a new [`Error`].
	///
	/// [`Error`]: struct@Error
	pub(crate) fn new(operation: Operation, kind: ErrorKind) -> Self {
		Self { operation, kind }
	}

	/// The operation that failed.
	pub fn operation(&self) -> Operation {
		self.operation
	}

	/// What went wrong.
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error means authentication requires a Steam Guard code.
	pub fn requires_guard_code(&self) -> bool {
		matches!(self.kind, ErrorKind::AuthRequiresGuardCode(_))
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.operation, self.kind)
	}
}

/// The different kinds of errors that can occur.
///
/// Domain errors carry the server-supplied description verbatim.
#[derive(Debug, ThisError)]
pub enum ErrorKind {
	/// Authentication was rejected.
	#[error("{0}")]
	AuthFailed(String),

	/// Authentication requires a Steam Guard code sent to the account's email address.
	#[error("{0}")]
	AuthRequiresGuardCode(String),

	/// The friend list came back empty.
	#[error("Empty friends list")]
	FriendsEmpty,

	/// The logon request was rejected.
	#[error("{0}")]
	LogonFailed(String),

	/// The automatic re-logon after a session expiry was rejected.
	#[error("{0}")]
	RelogonFailed(String),

	/// The logoff request was rejected.
	#[error("{0}")]
	LogoffFailed(String),

	/// A message could not be delivered.
	#[error("{0}")]
	MessageFailed(String),

	/// A poll request was rejected.
	#[error("{0}")]
	PollFailed(String),

	/// The summaries endpoint returned no players.
	#[error("No friends returned")]
	SummariesEmpty,

	/// The response body was not valid JSON.
	#[error("Parser: {0}")]
	Parser(#[from] serde_json::Error),

	/// The HTTP transport failed (connection error, timeout, non-2xx status, ...).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
