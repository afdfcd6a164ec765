//! An asynchronous client for Steam's legacy Web-chat ("UMQID") API.
//!
//! The API is a plain HTTPS+JSON affair: authenticate with account credentials, log on to
//! establish a presence session, then send messages and long-poll for incoming events. What makes
//! the client interesting is the layer between the HTTP transport and the caller:
//!
//! - one request builder and one parse callback per operation;
//! - automatic recovery from session expiry — when the server answers `"Not Logged On"`, the
//!   client re-logs on and resubmits the triggering request without the caller ever noticing;
//! - a FIFO send queue that keeps messages in submission order and is paused while a re-logon is
//!   in flight;
//! - transparent batching of summaries requests into groups of at most 100 ids.
//!
//! The entry point is [`SteamApi`]:
//!
//! ```no_run
//! use steam_chat::{OutgoingMessage, SteamApi};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = SteamApi::new(None)?;
//!
//! api.authenticate("username", "password", None).await?;
//! api.logon().await?;
//!
//! api.send_message(&OutgoingMessage::Say {
//! 	to: String::from("76561198282622073"),
//! 	text: String::from("hi!"),
//! })
//! .await?;
//!
//! for message in api.poll().await? {
//! 	println!("{message:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod message;
mod parse;
mod request;
mod session;
mod state;
mod summary;
mod transport;

pub use client::SteamApi;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use message::{Message, MessageKind, OutgoingMessage};
pub use request::{ApiRequest, Method, Operation};
pub use session::Session;
pub use state::SteamState;
pub use summary::Summary;
pub use transport::{HttpTransport, Transport, TransportError};
