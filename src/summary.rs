//! Profile summaries.

use serde::Deserialize;

use crate::state::SteamState;

/// Profile information about one account, as returned by the summaries endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
	/// The account's SteamID.
	pub steam_id: String,

	/// The account's display name.
	pub name: Option<String>,

	/// Link to the account's profile.
	pub profile_url: Option<String>,

	/// The account's "real" name.
	pub real_name: Option<String>,

	/// The game the account is currently playing.
	pub game: Option<String>,

	/// The address of the game server the account is currently on.
	pub game_server: Option<String>,

	/// The account's presence state.
	pub state: SteamState,
}

/// One entry of the `players` array on the wire.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSummary {
	steamid: String,
	personaname: Option<String>,
	profileurl: Option<String>,
	realname: Option<String>,
	gameextrainfo: Option<String>,
	gameserverip: Option<String>,
	personastate: Option<i64>,
}

impl From<RawSummary> for Summary {
	fn from(raw: RawSummary) -> Self {
		Self {
			steam_id: raw.steamid,
			name: raw.personaname,
			profile_url: raw.profileurl,
			real_name: raw.realname,
			game: raw.gameextrainfo,
			game_server: raw.gameserverip,
			state: SteamState::from_code(raw.personastate.unwrap_or_default()),
		}
	}
}
