//! Protocol Messages
//!
//! The session protocol is plain text over WebSocket:
//!
//! - client → server, once: `"<username>\n<joinCode>"`
//! - server → client: `"a<playerId>"` (accepted), `"b"` (bad join code),
//!   `"f"` (full), then the JSON game state whenever it is broadcast.
//!
//! Anything else from the client closes the socket with
//! [`PROTOCOL_ERROR_CLOSE_CODE`].

use serde_json::Value;

use crate::core::PlayerId;

/// WebSocket subprotocol the browser client requests.
pub const SUBPROTOCOL: &str = "nplanetary";

/// Close code for protocol violations.
pub const PROTOCOL_ERROR_CLOSE_CODE: u16 = 4002;

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// The client's first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// Display name; identifies the player across reconnects.
    pub username: String,
    /// Join code the client was given.
    pub join_code: String,
}

impl Handshake {
    /// Parse `"<username>\n<joinCode>"`.
    ///
    /// Exactly one newline is allowed and the username must not be empty.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let (username, join_code) = text.split_once('\n').ok_or(ProtocolError::MalformedHandshake)?;
        if username.is_empty() || join_code.contains('\n') {
            return Err(ProtocolError::MalformedHandshake);
        }

        Ok(Self {
            username: username.to_owned(),
            join_code: join_code.to_owned(),
        })
    }
}

/// A client broke the session protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// First message was not `username\njoinCode`.
    #[error("expected 'username\\njoinCode'")]
    MalformedHandshake,

    /// A binary frame arrived; the protocol is text only.
    #[error("binary frames are not supported")]
    BinaryFrame,

    /// A message arrived after the handshake completed.
    #[error("unexpected message after handshake")]
    UnexpectedMessage,
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Handshake accepted; carries the player's identity.
    Accepted(PlayerId),
    /// Join code did not match.
    BadCode,
    /// No seat available, or the identity is already connected.
    Full,
    /// Game state, already redacted for the recipient.
    State(Value),
}

impl ServerMessage {
    /// Text frame payload.
    pub fn to_text(&self) -> String {
        match self {
            ServerMessage::Accepted(id) => format!("a{}", id),
            ServerMessage::BadCode => "b".to_owned(),
            ServerMessage::Full => "f".to_owned(),
            ServerMessage::State(state) => state.to_string(),
        }
    }
}
