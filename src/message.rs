//! Chat messages and related events.
//!
//! Steam's poll endpoint multiplexes several kinds of events over a single "messages" array.
//! [`Message`] is the typed union of everything a poll can deliver; [`OutgoingMessage`] covers
//! the subset of kinds the message endpoint accepts for sending.

use crate::state::SteamState;

/// The different kinds of messages the poll endpoint can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
	/// A regular chat message.
	SayText,

	/// An emote ("/me") message.
	Emote,

	/// The other party closed the conversation window.
	LeftConversation,

	/// A relationship (friend list) change.
	Relationship,

	/// A presence state change.
	State,

	/// The other party is typing.
	Typing,
}

impl MessageKind {
	/// All message kinds.
	const ALL: [Self; 6] = [
		Self::SayText,
		Self::Emote,
		Self::LeftConversation,
		Self::Relationship,
		Self::State,
		Self::Typing,
	];

	/// The name of this kind as it appears in the `type` field on the wire.
	pub const fn wire_name(&self) -> &'static str {
		match self {
			Self::SayText => "saytext",
			Self::Emote => "emote",
			Self::LeftConversation => "leftconversation",
			Self::Relationship => "personarelationship",
			Self::State => "personastate",
			Self::Typing => "typing",
		}
	}

	/// Parses a kind from its wire name.
	///
	/// The comparison is case-insensitive. Returns [`None`] for unknown names.
	pub fn from_wire_name(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|kind| name.eq_ignore_ascii_case(kind.wire_name()))
	}
}

/// An incoming message or event, as delivered by the poll endpoint.
///
/// Instances are produced only by the poll parse callback and are immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	/// A regular chat message.
	Say {
		/// The sender's SteamID.
		from: String,

		/// The message text.
		text: String,
	},

	/// An emote ("/me") message.
	Emote {
		/// The sender's SteamID.
		from: String,

		/// The emote text.
		text: String,
	},

	/// The sender closed the conversation window.
	LeftConversation {
		/// The sender's SteamID.
		from: String,
	},

	/// The sender's relationship to us changed.
	Relationship {
		/// The sender's SteamID.
		from: String,

		/// The sender's presence state.
		state: SteamState,
	},

	/// The sender's presence state changed.
	State {
		/// The sender's SteamID.
		from: String,

		/// The sender's display name.
		name: String,

		/// The sender's new presence state.
		state: SteamState,
	},

	/// The sender is typing.
	Typing {
		/// The sender's SteamID.
		from: String,
	},
}

impl Message {
	/// The kind of this message.
	pub const fn kind(&self) -> MessageKind {
		match self {
			Self::Say { .. } => MessageKind::SayText,
			Self::Emote { .. } => MessageKind::Emote,
			Self::LeftConversation { .. } => MessageKind::LeftConversation,
			Self::Relationship { .. } => MessageKind::Relationship,
			Self::State { .. } => MessageKind::State,
			Self::Typing { .. } => MessageKind::Typing,
		}
	}

	/// The SteamID of the account this message came from.
	pub fn from(&self) -> &str {
		match self {
			Self::Say { from, .. }
			| Self::Emote { from, .. }
			| Self::LeftConversation { from }
			| Self::Relationship { from, .. }
			| Self::State { from, .. }
			| Self::Typing { from } => from,
		}
	}
}

/// A message to send to another account.
///
/// Only the kinds the message endpoint accepts are representable here; the poll-only kinds
/// (state/relationship changes etc.) cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
	/// A regular chat message.
	Say {
		/// The recipient's SteamID.
		to: String,

		/// The message text.
		text: String,
	},

	/// An emote ("/me") message.
	Emote {
		/// The recipient's SteamID.
		to: String,

		/// The emote text.
		text: String,
	},

	/// A typing notification.
	Typing {
		/// The recipient's SteamID.
		to: String,
	},
}

impl OutgoingMessage {
	/// The kind of this message.
	pub const fn kind(&self) -> MessageKind {
		match self {
			Self::Say { .. } => MessageKind::SayText,
			Self::Emote { .. } => MessageKind::Emote,
			Self::Typing { .. } => MessageKind::Typing,
		}
	}

	/// The SteamID of the recipient.
	pub fn to(&self) -> &str {
		match self {
			Self::Say { to, .. } | Self::Emote { to, .. } | Self::Typing { to } => to,
		}
	}

	/// The message text, for the kinds that carry one.
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Say { text, .. } | Self::Emote { text, .. } => Some(text),
			Self::Typing { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wire_name_round_trip() {
		for kind in MessageKind::ALL {
			assert_eq!(MessageKind::from_wire_name(kind.wire_name()), Some(kind));
		}
	}

	#[test]
	fn from_wire_name_is_case_insensitive() {
		assert_eq!(
			MessageKind::from_wire_name("SayText"),
			Some(MessageKind::SayText),
		);
		assert_eq!(
			MessageKind::from_wire_name("PERSONASTATE"),
			Some(MessageKind::State),
		);
	}

	#[test]
	fn unknown_wire_names_are_rejected() {
		assert_eq!(MessageKind::from_wire_name("webcam"), None);
		assert_eq!(MessageKind::from_wire_name(""), None);
	}
}
