//! Presence states.
//!
//! Steam reports a user's online status as a small integer. This module maps those integers onto
//! the [`SteamState`] enum and provides conversions from/to the human readable names used
//! elsewhere in the protocol.

/// A user's presence state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SteamState {
	/// The user is offline (or reported an unknown state).
	#[default]
	Offline,

	/// The user is online.
	Online,

	/// The user is busy.
	Busy,

	/// The user is away.
	Away,

	/// The user is snoozing.
	Snooze,
}

impl SteamState {
	/// All states, in wire-code order.
	const ALL: [Self; 5] = [
		Self::Offline,
		Self::Online,
		Self::Busy,
		Self::Away,
		Self::Snooze,
	];

	/// The human readable name of this state.
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Offline => "Offline",
			Self::Online => "Online",
			Self::Busy => "Busy",
			Self::Away => "Away",
			Self::Snooze => "Snooze",
		}
	}

	/// Parses a state from its human readable name.
	///
	/// The comparison is case-insensitive. Unknown names map to [`SteamState::Offline`].
	pub fn from_name(name: &str) -> Self {
		Self::ALL
			.into_iter()
			.find(|state| name.eq_ignore_ascii_case(state.name()))
			.unwrap_or_default()
	}

	/// Parses a state from its wire code.
	///
	/// Unknown codes map to [`SteamState::Offline`].
	pub const fn from_code(code: i64) -> Self {
		match code {
			1 => Self::Online,
			2 => Self::Busy,
			3 => Self::Away,
			4 => Self::Snooze,
			_ => Self::Offline,
		}
	}

	/// The wire code of this state.
	pub const fn code(&self) -> i64 {
		match self {
			Self::Offline => 0,
			Self::Online => 1,
			Self::Busy => 2,
			Self::Away => 3,
			Self::Snooze => 4,
		}
	}
}

impl std::fmt::Display for SteamState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn name_round_trip() {
		for state in SteamState::ALL {
			assert_eq!(SteamState::from_name(state.name()), state);
		}
	}

	#[test]
	fn from_name_is_case_insensitive() {
		assert_eq!(SteamState::from_name("ONLINE"), SteamState::Online);
		assert_eq!(SteamState::from_name("snooze"), SteamState::Snooze);
	}

	#[test]
	fn unknown_names_map_to_offline() {
		assert_eq!(SteamState::from_name("Invisible"), SteamState::Offline);
		assert_eq!(SteamState::from_name(""), SteamState::Offline);
	}

	#[test]
	fn code_round_trip() {
		for state in SteamState::ALL {
			assert_eq!(SteamState::from_code(state.code()), state);
		}
	}

	#[test]
	fn unknown_codes_map_to_offline() {
		assert_eq!(SteamState::from_code(-1), SteamState::Offline);
		assert_eq!(SteamState::from_code(17), SteamState::Offline);
	}
}
