//! Matrix protocol integration for the bot.
//!
//! - **Login**: first login or restoration of the stored session
//! - **Session**: persistence of the session and of the sync token
//! - **Sync**: auto-join of invited rooms and forwarding of text messages
//! - **Client**: [`MatrixClient`], sending command replies
//!
//! # Examples
//!
//! ```no_run
//! let credentials = UserCredentials {
//!     user_id: "@ranker:example.com".to_string(),
//!     password: "password".to_string(),
//!     passphrase: None,
//! };
//!
//! let client = MatrixClient::new(&credentials, Path::new("./data")).await?;
//! client.sync(|message| println!("{}: {}", message.sender, message.body)).await;
//! ```

use matrix_sdk::ruma::{OwnedEventId, OwnedRoomId, OwnedUserId};

mod client;
mod login;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// Matrix account of the bot.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: String,
    pub password: String,
    /// Passphrase encrypting the local store, if any.
    pub passphrase: Option<String>,
}

/// A text message received in a joined room.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub body: String,
    pub room_id: OwnedRoomId,
    pub sender: OwnedUserId,
    pub event_id: OwnedEventId,
}
