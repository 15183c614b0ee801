//! Network Layer
//!
//! WebSocket server and the lobby it feeds. Game state only leaves this
//! layer after passing through the redaction layer.

pub mod protocol;
pub mod session;
pub mod server;

pub use protocol::{Handshake, ProtocolError, ServerMessage, PROTOCOL_ERROR_CLOSE_CODE, SUBPROTOCOL};
pub use session::{Admission, Binding, ConnectionId, Lobby, Outbound};
pub use server::{GameServer, GameServerError};
